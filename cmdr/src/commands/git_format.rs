// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Renders version control results the way `git` prints them. Lines are joined with
//! `\n`; callers convert line endings when writing to the terminal.

use crate::{BranchInfo, CommitInfo, RepoHead, RepoStatus, green, red, yellow};

const SHORT_HASH_LEN: usize = 7;

#[must_use]
pub fn format_status(status: &RepoStatus) -> String {
    let mut lines = vec![];

    match &status.head {
        RepoHead::Branch(name) => lines.push(format!("On branch {name}")),
        RepoHead::Detached { hash } => {
            let short_hash = hash.chars().take(SHORT_HASH_LEN).collect::<String>();
            lines.push(format!("HEAD detached at {}", red(short_hash)));
        }
    }

    let staged = &status.staged;
    let has_staged =
        !(staged.modified.is_empty() && staged.deleted.is_empty() && staged.added.is_empty());
    let unstaged = &status.unstaged;
    let has_unstaged = !(unstaged.modified.is_empty() && unstaged.deleted.is_empty());
    let has_untracked = !status.untracked.is_empty();

    if has_staged {
        lines.push("Changes to be committed:".into());
        lines.push(r#"  (use "git restore --staged <file>..." to unstage)"#.into());
        for file in &staged.modified {
            lines.push(green(format!("\tmodified:   {file}")));
        }
        for file in &staged.deleted {
            lines.push(green(format!("\tdeleted:    {file}")));
        }
        for file in &staged.added {
            lines.push(green(format!("\tnew file:   {file}")));
        }
        lines.push(String::new());
    }

    if has_unstaged {
        lines.push("Changes not staged for commit:".into());
        lines.push(
            r#"  (use "git add/rm <file>..." to update what will be committed)"#.into(),
        );
        lines.push(
            r#"  (use "git restore <file>..." to discard changes in working directory)"#
                .into(),
        );
        for file in &unstaged.modified {
            lines.push(red(format!("\tmodified:   {file}")));
        }
        for file in &unstaged.deleted {
            lines.push(red(format!("\tdeleted:    {file}")));
        }
        lines.push(String::new());
    }

    if has_untracked {
        lines.push("Untracked files:".into());
        lines.push(
            r#"  (use "git add <file>..." to include in what will be committed)"#.into(),
        );
        for file in &status.untracked {
            lines.push(red(format!("\t{file}")));
        }
        lines.push(String::new());
    }

    if !(has_staged || has_unstaged || has_untracked) {
        lines.push("nothing to commit, working tree clean".into());
    }

    lines.join("\n")
}

#[must_use]
pub fn format_log(commits: &[CommitInfo]) -> String {
    commits
        .iter()
        .map(|commit| {
            format!(
                "{}\nAuthor: {} <{}>\nDate:   {}\n\n    {}",
                yellow(format!("commit {}", commit.hash)),
                commit.author.name,
                commit.author.email,
                commit.date,
                commit.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[must_use]
pub fn format_branches(branches: &[BranchInfo]) -> String {
    branches
        .iter()
        .map(|branch| {
            if branch.is_head {
                green(format!("* {}", branch.name))
            } else {
                format!("  {}", branch.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn format_tags(tags: &[String]) -> String {
    tags.iter().map(yellow).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Author, StagedChanges, UnstagedChanges};

    fn status(head: RepoHead) -> RepoStatus {
        RepoStatus {
            head,
            staged: StagedChanges::default(),
            unstaged: UnstagedChanges::default(),
            untracked: vec![],
        }
    }

    #[test]
    fn test_clean_tree() {
        assert_eq!(
            format_status(&status(RepoHead::Branch("main".into()))),
            "On branch main\nnothing to commit, working tree clean"
        );
    }

    #[test]
    fn test_detached_head_shows_short_hash() {
        let text = format_status(&status(RepoHead::Detached {
            hash: "0123456789abcdef".into(),
        }));
        assert!(text.starts_with("HEAD detached at "));
        assert!(text.contains(&red("0123456")));
        assert!(!text.contains("01234567"));
    }

    #[test]
    fn test_sections_in_order() {
        let mut it = status(RepoHead::Branch("dev".into()));
        it.staged.added.push("new.rs".into());
        it.unstaged.deleted.push("old.rs".into());
        it.untracked.push("notes.txt".into());

        let text = format_status(&it);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[1], "Changes to be committed:");
        assert_eq!(lines[3], green("\tnew file:   new.rs"));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Changes not staged for commit:");
        assert_eq!(lines[8], red("\tdeleted:    old.rs"));
        assert_eq!(lines[10], "Untracked files:");
        assert_eq!(lines[12], red("\tnotes.txt"));
        assert!(!text.contains("nothing to commit"));
    }

    #[test]
    fn test_log_entries_are_separated_by_blank_line() {
        let commit = |hash: &str, message: &str| CommitInfo {
            hash: hash.into(),
            author: Author {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
            date: "Mon Jan 1 00:00:00 2024 +0000".into(),
            message: message.into(),
        };

        assert_eq!(
            format_log(&[commit("b2", "second"), commit("a1", "first")]),
            format!(
                "{}\nAuthor: Ada <ada@example.com>\nDate:   Mon Jan 1 00:00:00 2024 +0000\n\n    second\n\n\
                 {}\nAuthor: Ada <ada@example.com>\nDate:   Mon Jan 1 00:00:00 2024 +0000\n\n    first",
                yellow("commit b2"),
                yellow("commit a1"),
            )
        );
    }

    #[test]
    fn test_branches_mark_head() {
        let branches = [
            BranchInfo {
                name: "dev".into(),
                is_head: false,
            },
            BranchInfo {
                name: "main".into(),
                is_head: true,
            },
        ];
        assert_eq!(
            format_branches(&branches),
            format!("  dev\n{}", green("* main"))
        );
        assert_eq!(format_tags(&["v1.0".into()]), yellow("v1.0"));
    }
}
