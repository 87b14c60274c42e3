pub mod api;
pub mod models;

pub use models::{
    Answer, Collection, HrEntry, Job, LoadNotice, NewAnswer, NewHrEntry, NewJob, NewQuestion,
    Question, Record, RefreshReport,
};
