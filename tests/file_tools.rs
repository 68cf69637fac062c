use std::fs;
use std::path::Path;

use patzm_scripts::ToolError;
use patzm_scripts::rename::{self, Rename, RenameOptions};
use patzm_scripts::tree::{self, DirCount, SortOrder};
use tempfile::tempdir;

fn touch(path: &Path) {
    fs::write(path, b"").expect("file written");
}

#[test]
fn renames_timestamped_files_into_new_pattern() {
    let temp_dir = tempdir().expect("temporary directory");
    let source = temp_dir.path().join("20230415_093012.jpg");
    touch(&source);
    let options = RenameOptions {
        format_out: "%Y-%m-%d %H.%M.%S".to_string(),
        ..RenameOptions::default()
    };

    let renames = rename::rename_files(&[&source], &options).expect("rename succeeds");

    let target = temp_dir.path().join("2023-04-15 09.30.12.jpg");
    assert_eq!(
        renames,
        vec![Rename {
            from: source.clone(),
            to: target.clone(),
        }]
    );
    assert!(target.is_file());
    assert!(!source.exists());
}

#[test]
fn dry_run_only_plans() {
    let temp_dir = tempdir().expect("temporary directory");
    let source = temp_dir.path().join("IMG_20230415.png");
    touch(&source);
    let options = RenameOptions {
        format_in: "IMG_%Y%m%d".to_string(),
        format_out: "%Y-%m-%d".to_string(),
        dry_run: true,
    };

    let renames = rename::rename_files(&[&source], &options).expect("rename succeeds");

    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0].to, temp_dir.path().join("2023-04-15.png"));
    assert!(source.exists());
    assert!(!renames[0].to.exists());
}

#[test]
fn skips_directories_unparsable_names_and_existing_targets() {
    let temp_dir = tempdir().expect("temporary directory");
    let dir = temp_dir.path().join("20230415_093012");
    fs::create_dir(&dir).expect("directory created");
    let unparsable = temp_dir.path().join("holiday.jpg");
    touch(&unparsable);
    let blocked = temp_dir.path().join("20230415_093012.txt");
    touch(&blocked);
    let existing = temp_dir.path().join("2023-04-15.txt");
    touch(&existing);
    let missing = temp_dir.path().join("20230101_000000.txt");
    let options = RenameOptions {
        format_out: "%Y-%m-%d".to_string(),
        ..RenameOptions::default()
    };

    let renames = rename::rename_files(&[&dir, &unparsable, &blocked, &missing], &options)
        .expect("rename succeeds");

    assert!(renames.is_empty());
    assert!(blocked.exists());
    assert!(unparsable.exists());
}

#[test]
fn invalid_formats_are_rejected_up_front() {
    let options = RenameOptions {
        format_out: "%Y-%".to_string(),
        ..RenameOptions::default()
    };
    let no_files: [&Path; 0] = [];

    let error = rename::rename_files(&no_files, &options).expect_err("format rejected");

    assert!(matches!(error, ToolError::InvalidDateFormat(ref format) if format == "%Y-%"));
}

#[test]
fn parse_stem_accepts_date_only_patterns() {
    let datetime = rename::parse_stem("20230415", "%Y%m%d").expect("stem parsed");
    assert_eq!(datetime.to_string(), "2023-04-15 00:00:00");
    assert!(rename::parse_stem("2023", "%Y%m%d").is_none());
}

fn sample_tree(root: &Path) {
    fs::create_dir_all(root.join("music/rock")).expect("directories created");
    fs::create_dir_all(root.join("photos")).expect("directories created");
    fs::create_dir_all(root.join("empty")).expect("directories created");
    touch(&root.join("readme.txt"));
    touch(&root.join("music/a.mp3"));
    touch(&root.join("music/rock/b.mp3"));
    touch(&root.join("music/rock/c.mp3"));
    touch(&root.join("photos/d.jpg"));
}

fn child<'a>(tree: &'a DirCount, name: &str) -> &'a DirCount {
    tree.children
        .iter()
        .find(|child| child.name == name)
        .expect("child present")
}

#[test]
fn counts_files_recursively() {
    let temp_dir = tempdir().expect("temporary directory");
    sample_tree(temp_dir.path());

    let counted = tree::count_files(temp_dir.path()).expect("tree counted");

    assert_eq!(counted.files, 5);
    assert_eq!(counted.name, temp_dir.path().display().to_string());
    assert_eq!(child(&counted, "music").files, 3);
    assert_eq!(child(child(&counted, "music"), "rock").files, 2);
    assert_eq!(child(&counted, "photos").files, 1);
    assert_eq!(child(&counted, "empty").files, 0);
}

#[test]
fn renders_sorted_tree() {
    let temp_dir = tempdir().expect("temporary directory");
    let root = temp_dir.path().join("root");
    fs::create_dir(&root).expect("root created");
    sample_tree(&root);

    let mut counted = tree::count_files(&root).expect("tree counted");
    tree::sort_tree(&mut counted, SortOrder::Descending);
    let rendered = tree::render(&counted);

    let expected = format!(
        "{}: 5\n\
         ├── music: 3\n\
         │   └── rock: 2\n\
         ├── photos: 1\n\
         └── empty: 0\n",
        root.display()
    );
    assert_eq!(rendered, expected);

    tree::sort_tree(&mut counted, SortOrder::Ascending);
    let names: Vec<&str> = counted
        .children
        .iter()
        .map(|child| child.name.as_str())
        .collect();
    assert_eq!(names, vec!["empty", "photos", "music"]);
}

#[test]
fn tilde_is_expanded_to_home() {
    let plain = Path::new("/tmp/data");
    assert_eq!(tree::expand_tilde(plain), plain);

    if let Some(home) = dirs::home_dir() {
        assert_eq!(tree::expand_tilde(Path::new("~/music")), home.join("music"));
    }
}
