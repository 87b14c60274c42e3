//! Pure projections over a snapshot. Nothing here touches shared state.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use placement_types::api::{DayCount, QuestionStatus, TextCount, TopicGroup};
use placement_types::{Answer, HrEntry, Job, Question};

pub const RECENT_WINDOW_DAYS: i64 = 7;
pub const MOST_ASKED_LIMIT: usize = 5;
pub const JOB_OPENINGS_LIMIT: usize = 10;

/// Bucket label for rows with a blank grouping field.
pub const UNKNOWN: &str = "Unknown";

// -- Grouping --

/// Partition `items` by topic. Groups appear in order of first appearance and
/// keep their members in source order.
pub fn group_by_topic<T>(items: Vec<T>, topic: impl Fn(&T) -> &str) -> Vec<TopicGroup<T>> {
    let mut groups: Vec<TopicGroup<T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = topic(&item).to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(TopicGroup {
                topic: key,
                count: 0,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.items.push(item);
        group.count += 1;
    }
    groups
}

/// Count occurrences of each key, first-appearance order.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<TextCount> {
    let mut counts: Vec<TextCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key, counts.len());
                counts.push(TextCount {
                    text: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() { UNKNOWN } else { value }
}

// -- Answers --

pub fn answers_for<'a>(
    question_id: &'a str,
    answers: &'a [Answer],
) -> impl Iterator<Item = &'a Answer> {
    answers.iter().filter(move |a| a.question_id == question_id)
}

pub fn answer_count(question_id: &str, answers: &[Answer]) -> usize {
    answers_for(question_id, answers).count()
}

pub fn is_answered(question_id: &str, answers: &[Answer]) -> bool {
    answers_for(question_id, answers).next().is_some()
}

pub fn status(question_id: &str, answers: &[Answer]) -> QuestionStatus {
    if is_answered(question_id, answers) {
        QuestionStatus::Answered
    } else {
        QuestionStatus::Pending
    }
}

/// Questions with no answer at all.
pub fn unanswered_count(questions: &[Question], answers: &[Answer]) -> usize {
    questions
        .iter()
        .filter(|q| !is_answered(&q.id, answers))
        .count()
}

// -- Recency --

/// True when `created_at` is at most seven days before `now`. Timestamps
/// ahead of `now` count as recent.
pub fn is_recent(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at <= Duration::days(RECENT_WINDOW_DAYS)
}

pub fn recent_questions(questions: &[Question], now: DateTime<Utc>) -> Vec<&Question> {
    questions
        .iter()
        .filter(|q| is_recent(q.created_at, now))
        .collect()
}

/// Recent questions per calendar day (UTC), first-appearance order.
pub fn recent_by_day(questions: &[Question], now: DateTime<Utc>) -> Vec<DayCount> {
    let mut days: Vec<DayCount> = Vec::new();
    for q in recent_questions(questions, now) {
        let date: NaiveDate = q.created_at.date_naive();
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => day.count += 1,
            None => days.push(DayCount { date, count: 1 }),
        }
    }
    days
}

/// Recent questions per topic; blank topics fall under "Unknown".
pub fn recent_by_topic(questions: &[Question], now: DateTime<Utc>) -> Vec<TextCount> {
    tally(
        recent_questions(questions, now)
            .into_iter()
            .map(|q| or_unknown(&q.topic)),
    )
}

// -- Rankings --

/// The five most frequent question texts. Ties keep first-appearance order.
pub fn most_asked(questions: &[Question]) -> Vec<TextCount> {
    let mut counts = tally(questions.iter().map(|q| q.text.as_str()));
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(MOST_ASKED_LIMIT);
    counts
}

/// Jobs posted per DA; blank names fall under "Unknown".
pub fn jobs_by_da(jobs: &[Job]) -> Vec<TextCount> {
    tally(jobs.iter().map(|j| or_unknown(&j.da_name)))
}

/// Jobs sorted newest first, stable for equal timestamps.
pub fn newest_first(jobs: &[Job]) -> Vec<Job> {
    let mut sorted = jobs.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

// -- Search --

/// Case-insensitive substring match over `fields`. An empty term matches.
pub fn matches_search(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

pub fn hr_entry_matches(entry: &HrEntry, term: &str) -> bool {
    matches_search(term, &[&entry.company_name, &entry.hr_name, &entry.hr_contact])
}

pub fn job_matches(job: &Job, term: &str) -> bool {
    matches_search(term, &[&job.da_name, &job.job_link])
}

pub fn question_matches(question: &Question, term: &str) -> bool {
    matches_search(term, &[&question.text])
}

/// `None`, empty and "All" disable the topic filter.
pub fn topic_matches(question: &Question, topic: Option<&str>) -> bool {
    match topic {
        None | Some("") | Some("All") => true,
        Some(t) => question.topic == t,
    }
}
