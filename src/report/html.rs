//! HTML rendering of the branch report.
//!
//! Pure string-building functions: given a [`RenderContext`] they always
//! produce the same document, and nothing here touches the repository.

use crate::git::Commit;
use crate::report::context::{BranchStatus, BranchSummary, RenderContext, RenderOptions};
use crate::report::format::{format_age, format_date};

const STYLE: &str = "<style>\n\
    body { font-family: sans-serif; margin: 2em auto; max-width: 60em; }\n\
    h1 small { color: #666; font-size: 60%; }\n\
    section.branch { border-top: 1px solid #ddd; padding: 0.5em 0; }\n\
    .status.merged { color: #2a2; }\n\
    .status.unmerged { color: #d80; }\n\
    .age { color: #666; font-size: 85%; }\n\
    .date { color: #666; }\n\
    .merged-note { color: #2a2; }\n\
    ul.ignored li { color: #666; }\n\
    p.last-update { color: #999; font-size: 85%; }\n\
    </style>\n";

/// Renders the full report page for the given context.
///
/// The output is a complete UTF-8 HTML document: a heading with the
/// repository and remote names, the shown branches in the given order (or a
/// placeholder when there are none), and an ignored-branches section that is
/// omitted entirely when empty.
pub fn render(context: &RenderContext) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!(
        "<title>Branches in {}</title>\n",
        escape(&context.repo_name)
    ));
    page.push_str(STYLE);
    page.push_str("</head>\n<body>\n");

    page.push_str(&format!(
        "<h1>{} <small>branches on {}</small></h1>\n",
        escape(&context.repo_name),
        escape(&context.remote)
    ));
    page.push_str(&format!(
        "<p class=\"baseline\">Compared against <code>{}</code>.</p>\n",
        escape(&context.master_branch)
    ));

    if context.shown_branches.is_empty() {
        page.push_str("<p class=\"empty\">No branches.</p>\n");
    } else {
        for summary in &context.shown_branches {
            page.push_str(&render_branch(summary, &context.options));
        }
    }

    if !context.ignored_branches.is_empty() {
        page.push_str("<h2>Ignored Branches</h2>\n<ul class=\"ignored\">\n");
        for name in &context.ignored_branches {
            page.push_str(&format!("<li>{}</li>\n", escape(name)));
        }
        page.push_str("</ul>\n");
    }

    if let Some(last_update) = context.last_update {
        page.push_str(&format!(
            "<p class=\"last-update\">Last update: {}</p>\n",
            format_date(last_update)
        ));
    }

    page.push_str("</body>\n</html>\n");
    page
}

/// Renders one branch's detail block.
pub fn render_branch(summary: &BranchSummary, options: &RenderOptions) -> String {
    let mut block = String::new();

    block.push_str("<section class=\"branch\">\n");
    block.push_str(&format!(
        "<h2>{} {} <span class=\"age\">last updated {} ago</span></h2>\n",
        status_marker(summary.status()),
        escape(&summary.name),
        escape(&format_age(summary.age))
    ));
    block.push_str(&format!(
        "<p class=\"tip\">{}</p>\n",
        render_commit(&summary.commit, options)
    ));

    match summary.status() {
        BranchStatus::HasUnmergedCommits => {
            block.push_str(&format!("<h3>{}</h3>\n", unmerged_header(summary, options)));
            block.push_str("<ol class=\"commits\">\n");
            for commit in &summary.unmerged {
                block.push_str(&format!("<li>{}</li>\n", render_commit(commit, options)));
            }
            block.push_str("</ol>\n");
        }
        BranchStatus::NoUnmergedCommits => {
            block.push_str(
                "<p class=\"merged-note\">No unmerged commits. This branch can be removed.</p>\n",
            );
        }
    }

    block.push_str("</section>\n");
    block
}

/// Renders one commit as an inline fragment.
///
/// The short hash becomes a hyperlink when a commit details URL format is
/// configured, the author is linked via `mailto:`, and the subject is
/// truncated per the subject limit with the full subject kept as the
/// tooltip.
pub fn render_commit(commit: &Commit, options: &RenderOptions) -> String {
    let hash = match &options.commit_details_url_fmt {
        Some(fmt) => format!(
            "<a href=\"{}\"><code>{}</code></a>",
            escape(&fmt.url_for(commit)),
            commit.short_hash()
        ),
        None => format!("<code>{}</code>", commit.short_hash()),
    };

    let subject = match options.commit_subject_limit {
        Some(limit) => commit.short_subject(limit),
        None => commit.subject().to_string(),
    };

    format!(
        "<span class=\"commit\">{} <a href=\"mailto:{}\">{}</a> \
         <span class=\"date\">{}</span> \
         <span class=\"subject\" title=\"{}\">{}</span></span>",
        hash,
        escape(commit.email()),
        escape(commit.author()),
        format_date(commit.date()),
        escape(commit.subject()),
        escape(&subject)
    )
}

fn unmerged_header(summary: &BranchSummary, options: &RenderOptions) -> String {
    match options.unmerged_commits_limit {
        Some(limit) if summary.total_unmerged > limit => format!(
            "Unmerged commits (showing the last {} out of {})",
            limit, summary.total_unmerged
        ),
        _ => format!("Unmerged commits ({})", summary.total_unmerged),
    }
}

fn status_marker(status: BranchStatus) -> &'static str {
    match status {
        BranchStatus::NoUnmergedCommits => {
            "<span class=\"status merged\" title=\"fully merged\">\u{2713}</span>"
        }
        BranchStatus::HasUnmergedCommits => {
            "<span class=\"status unmerged\" title=\"has unmerged commits\">\u{25cf}</span>"
        }
    }
}

/// Escapes text for interpolation into HTML content or attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
