//! Plain-text rendering of GitHub entities.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use console::Style;
use ghdash_api::{Issue, Label, PullRequest, RepositoryDetail, RepositorySummary};

fn date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Nearest xterm-256 color cube index for a six-digit hex color.
fn xterm_index(hex: &str) -> u8 {
    let Ok(rgb) = u32::from_str_radix(hex, 16) else {
        return 16;
    };
    let level = |shift: u32| -> u8 {
        let c = u16::try_from((rgb >> shift) & 0xff).unwrap_or(0);
        u8::try_from((c * 5 + 127) / 255).unwrap_or(5)
    };
    16 + 36 * level(16) + 6 * level(8) + level(0)
}

/// Label badge in its own color, with dark text on light backgrounds.
fn label_style(label: &Label, color: bool) -> Style {
    let style = Style::new()
        .on_color256(xterm_index(&label.color))
        .force_styling(color);
    if label.is_light() {
        style.black()
    } else {
        style.white()
    }
}

fn labels(labels: &[Label], color: bool) -> String {
    labels
        .iter()
        .map(|l| label_style(l, color).apply_to(format!("[{}]", l.name)).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn author(issue: &Issue) -> &str {
    issue.user.as_ref().map_or("ghost", |u| u.login.as_str())
}

/// One line per search result, in ranking order.
pub fn repositories(repos: &[RepositorySummary]) -> String {
    if repos.is_empty() {
        return "No repositories found.\n".to_string();
    }

    let mut out = String::new();
    for repo in repos {
        let _ = write!(out, "{:<40} * {:>7}", repo.full_name, repo.stargazers_count);
        if let Some(lang) = &repo.language {
            let _ = write!(out, "  {lang}");
        }
        out.push('\n');
        if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "    {desc}");
        }
    }
    out
}

/// Repository detail page.
pub fn repository(repo: &RepositoryDetail) -> String {
    let s = &repo.summary;
    let mut out = String::new();

    let _ = writeln!(out, "{}", s.full_name);
    let _ = writeln!(out, "{}", "=".repeat(s.full_name.len()));
    if let Some(desc) = &s.description {
        let _ = writeln!(out, "{desc}");
    }
    out.push('\n');
    let _ = writeln!(out, "Stars:          {}", s.stargazers_count);
    let _ = writeln!(out, "Forks:          {}", repo.forks_count);
    let _ = writeln!(out, "Open issues:    {}", repo.open_issues_count);
    let _ = writeln!(out, "Language:       {}", s.language.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Default branch: {}", repo.default_branch);
    if let Some(created) = &repo.created_at {
        let _ = writeln!(out, "Created:        {}", date(created));
    }
    if !repo.topics.is_empty() {
        let _ = writeln!(out, "Topics:         {}", repo.topics.join(", "));
    }
    let _ = writeln!(out, "URL:            {}", s.html_url);
    out
}

fn issue_line(out: &mut String, issue: &Issue, status: &str, color: bool) {
    let _ = write!(
        out,
        "#{:<6} {:<7} {} - {} opened {}",
        issue.number,
        status,
        issue.title,
        author(issue),
        date(&issue.created_at)
    );
    if !issue.labels.is_empty() {
        let _ = write!(out, " {}", labels(&issue.labels, color));
    }
    out.push('\n');
}

/// One line per issue, open and closed alike.
///
/// Labels are drawn in their own colors when `color` is set.
pub fn issues(issues: &[Issue], color: bool) -> String {
    if issues.is_empty() {
        return "No issues.\n".to_string();
    }

    let mut out = String::new();
    for issue in issues {
        issue_line(&mut out, issue, &issue.state.to_string(), color);
    }
    out
}

/// One line per pull request, badged by status.
pub fn pull_requests(pulls: &[PullRequest], color: bool) -> String {
    if pulls.is_empty() {
        return "No pull requests.\n".to_string();
    }

    let mut out = String::new();
    for pr in pulls {
        issue_line(&mut out, &pr.issue, &pr.status().to_string(), color);
    }
    out
}

pub fn token_status(masked: &str, storage: &Path) -> String {
    format!("Token: {masked}\nStored in: {}\n", storage.display())
}
