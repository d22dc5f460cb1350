// src/site/course.rs

use crate::{client::RobustClient, error::*, scratch::ScratchDir};
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

static WEEK_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/todo/([^"]+)"><div"#).unwrap());
static STEP_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/steps/([^"]+)"><span>"#).unwrap());

/// URL layout of one course run.
#[derive(Debug, Clone)]
pub struct CourseUrls {
    base_url: String,
    pub course: String,
    pub run: u32,
}

impl CourseUrls {
    pub fn new(base_url: &str, course: &str, run: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            course: course.to_string(),
            run,
        }
    }

    fn run_root(&self) -> String {
        format!("{}/courses/{}/{}", self.base_url, self.course, self.run)
    }

    pub fn todo(&self) -> String {
        format!("{}/todo", self.run_root())
    }

    pub fn week(&self, week_id: &str) -> String {
        format!("{}/todo/{}", self.run_root(), week_id)
    }

    pub fn step(&self, step_id: &str) -> String {
        format!("{}/steps/{}", self.run_root(), step_id)
    }
}

/// Week ids in the order the course page lists them.
pub fn parse_week_ids(content: &str) -> Vec<String> {
    WEEK_LINK_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

/// Step ids in the order the week page lists them.
pub fn parse_step_ids(content: &str) -> Vec<String> {
    STEP_LINK_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

async fn fetch_required(client: &RobustClient, url: String) -> AppResult<String> {
    let (status, content) = client.get_page(&url).await?;
    if !status.is_success() {
        return Err(AppError::PageFetch {
            url,
            status: status.as_u16(),
        });
    }
    Ok(content)
}

pub async fn fetch_week_ids(
    client: &RobustClient,
    urls: &CourseUrls,
    scratch: &ScratchDir,
) -> AppResult<Vec<String>> {
    let content = fetch_required(client, urls.todo()).await?;
    scratch.save_debug(&format!("course.{}.response.content", urls.course), &content)?;
    let weeks = parse_week_ids(&content);
    info!("course '{}' lists {} weeks", urls.course, weeks.len());
    Ok(weeks)
}

pub async fn fetch_step_ids(
    client: &RobustClient,
    urls: &CourseUrls,
    week_id: &str,
    scratch: &ScratchDir,
) -> AppResult<Vec<String>> {
    let content = fetch_required(client, urls.week(week_id)).await?;
    scratch.save_debug(
        &format!("course.{}.w{}.response.content", urls.course, week_id),
        &content,
    )?;
    let steps = parse_step_ids(&content);
    debug!("week {} steps: {:?}", week_id, steps);
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let urls = CourseUrls::new("https://www.futurelearn.com/", "intro-x", 2);
        assert_eq!(urls.todo(), "https://www.futurelearn.com/courses/intro-x/2/todo");
        assert_eq!(urls.week("1234"), "https://www.futurelearn.com/courses/intro-x/2/todo/1234");
        assert_eq!(urls.step("5678"), "https://www.futurelearn.com/courses/intro-x/2/steps/5678");
    }

    #[test]
    fn test_parse_week_and_step_ids() {
        let course_page = r#"
            <li><a href="/courses/intro-x/2/todo/1001"><div class="week">Week 1</div></a></li>
            <li><a href="/courses/intro-x/2/todo/1002"><div class="week">Week 2</div></a></li>
            <a href="/courses/intro-x/2/todo/progress">Progress</a>
        "#;
        assert_eq!(parse_week_ids(course_page), vec!["1001", "1002"]);

        let week_page = r#"<a href="/courses/intro-x/2/steps/31"><span>1.1</span></a><a href="/courses/intro-x/2/steps/32"><span>1.2</span></a>"#;
        assert_eq!(parse_step_ids(week_page), vec!["31", "32"]);
        assert!(parse_step_ids("<p>no steps</p>").is_empty());
    }
}
