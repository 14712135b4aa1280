//! End-to-end project materialization against real and in-memory filesystems.

use std::fs;
use std::path::{Path, PathBuf};

use podsmith_adapters::{LocalFilesystem, MemoryFilesystem, ProcessRunner, TemplateAcquirer};
use podsmith_core::{
    application::{
        ScaffoldService, TemplateOrigin, TemplateSettings,
        services::{MaterializeJob, Materializer},
    },
    domain::{AuthorIdentity, ModuleName},
    prelude::*,
};
use walkdir::WalkDir;

const TOKEN: &str = "NBTemplateModule";

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small template tree shaped like the real one.
fn template_repo(root: &Path) -> PathBuf {
    let payload = root.join("template").join(TOKEN);
    write(
        &payload.join(format!("{TOKEN}.podspec")),
        concat!(
            "Pod::Spec.new do |s|\n",
            "  s.name = 'NBTemplateModule'\n",
            "  s.author = 'Old'\n",
            "  s.summary = 'old'\n",
            "end\n",
        ),
    );
    write(
        &payload
            .join(TOKEN)
            .join("Classes")
            .join(format!("{TOKEN}.swift")),
        "public final class NBTemplateModule {}\n",
    );
    write(
        &payload
            .join(TOKEN)
            .join("Classes")
            .join(format!("{TOKEN}.h")),
        "#import <NBTemplateModule/NBTemplateModule.h>\n",
    );
    write(
        &payload.join("Example").join("Podfile"),
        "pod 'NBTemplateModule', :path => '../'\n",
    );
    write(&payload.join("README.md"), "# NBTemplateModule\n");
    write(&payload.join("README.md.orig"), "leftover\n");
    write(&payload.join("notes.txt~"), "swap\n");
    root.join("template")
}

fn settings() -> TemplateSettings {
    TemplateSettings {
        name: TOKEN.into(),
        repo: String::new(),
        branch: "main".into(),
        path: "template".into(),
    }
}

fn scaffold_service(work: &Path, cache: &Path) -> ScaffoldService {
    let source = TemplateAcquirer::new(
        settings(),
        cache,
        Box::new(LocalFilesystem),
        Box::new(ProcessRunner::silent()),
    )
    .with_local_candidates(vec![work.join("template")]);
    ScaffoldService::new(Box::new(source), Box::new(LocalFilesystem))
}

fn all_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap().into_path())
        .collect()
}

#[test]
fn creates_renamed_and_substituted_project() {
    let work = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    template_repo(work.path());
    let out = work.path().join("out");

    let service = scaffold_service(work.path(), &home.path().join("template"));
    let request = CreateRequest::new(ModuleName::parse("MyLib").unwrap(), &out)
        .include_example(false);
    let report = service
        .create(&request, &AuthorIdentity::new("Jane", "jane@example.com"))
        .unwrap();

    let project = out.join("MyLib");
    assert_eq!(report.project_dir(), project);
    assert_eq!(report.origin, TemplateOrigin::LocalDev);

    let podspec = fs::read_to_string(project.join("MyLib.podspec")).unwrap();
    assert!(podspec.contains("s.author = 'Jane'"));
    assert!(podspec.contains("s.name = 'MyLib'"));
    assert!(podspec.contains("s.summary = 'A brief description of MyLib'"));

    assert!(project.join("MyLib/Classes/MyLib.swift").is_file());
    assert!(!project.join("Example").exists());
    assert!(report.materialized.example_removed);
    assert!(!project.join("README.md.orig").exists());
    assert!(!project.join("notes.txt~").exists());
    assert_eq!(report.materialized.cleaned.len(), 2);

    for path in all_paths(&project) {
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(
            !name.contains(TOKEN),
            "name still has token: {}",
            path.display()
        );
        if path.is_file() {
            let content = fs::read(&path).unwrap();
            let text = String::from_utf8_lossy(&content);
            assert!(
                !text.contains(TOKEN),
                "content still has token: {}",
                path.display()
            );
        }
    }

    // No staging directory is left next to the project.
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("MyLib")]);
}

#[test]
fn second_create_fails_without_touching_first() {
    let work = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    template_repo(work.path());
    let out = work.path().join("out");
    let service = scaffold_service(work.path(), &home.path().join("template"));
    let request = CreateRequest::new(ModuleName::parse("MyLib").unwrap(), &out)
        .include_example(false);
    let identity = AuthorIdentity::new("Jane", "jane@example.com");

    service.create(&request, &identity).unwrap();
    let marker = out.join("MyLib/local-change.txt");
    fs::write(&marker, "keep me").unwrap();

    let err = service.create(&request, &identity).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&marker).unwrap(), "keep me");
}

#[test]
fn example_is_kept_when_requested() {
    let work = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();
    template_repo(work.path());
    let out = work.path().join("out");
    let service = scaffold_service(work.path(), &home.path().join("template"));
    let request = CreateRequest::new(ModuleName::parse("MyLib").unwrap(), &out);

    service
        .create(&request, &AuthorIdentity::default())
        .unwrap();

    let podfile = fs::read_to_string(out.join("MyLib/Example/Podfile")).unwrap();
    assert_eq!(podfile, "pod 'MyLib', :path => '../'\n");
}

#[test]
fn binary_content_is_substituted_bytewise() {
    let work = tempfile::tempdir().unwrap();
    let payload = work.path().join(TOKEN);
    let mut blob = vec![0xff, 0xfe, 0x00];
    blob.extend_from_slice(TOKEN.as_bytes());
    fs::create_dir_all(&payload).unwrap();
    fs::write(payload.join("Info.plist"), &blob).unwrap();

    let module = ModuleName::parse("MyLib").unwrap();
    let identity = AuthorIdentity::default();
    let out = work.path().join("out");
    let job = MaterializeJob {
        payload_dir: &payload,
        token: TOKEN,
        module: &module,
        output_dir: &out,
        include_example: true,
        identity: &identity,
    };
    Materializer::new(&LocalFilesystem)
        .materialize(&job)
        .unwrap();

    let written = fs::read(out.join("MyLib/Info.plist")).unwrap();
    assert_eq!(&written[..3], &[0xff, 0xfe, 0x00]);
    assert_eq!(&written[3..], b"MyLib");
}

#[test]
fn nested_names_are_renamed_deepest_first() {
    let fs = MemoryFilesystem::new().with_file("/tpl/P/sub_P/file_P.txt", "P");
    let module = ModuleName::parse("Q").unwrap();
    let identity = AuthorIdentity::default();
    let job = MaterializeJob {
        payload_dir: Path::new("/tpl/P"),
        token: "P",
        module: &module,
        output_dir: Path::new("/out"),
        include_example: true,
        identity: &identity,
    };

    let report = Materializer::new(&fs).materialize(&job).unwrap();

    let moved = fs.read_file(Path::new("/out/Q/sub_Q/file_Q.txt"));
    assert_eq!(moved.as_deref(), Some("Q"));
    assert_eq!(
        report.renamed,
        vec![
            (PathBuf::from("sub_P/file_P.txt"), PathBuf::from("sub_P/file_Q.txt")),
            (PathBuf::from("sub_P"), PathBuf::from("sub_Q")),
        ]
    );

    // Every rename source must still exist when it is renamed, which means no
    // parent was renamed before its children.
    let renames = fs.renames();
    for (i, (from, _)) in renames.iter().enumerate() {
        for (earlier_from, _) in &renames[..i] {
            assert!(
                !from.starts_with(earlier_from),
                "{from:?} renamed after its parent"
            );
        }
    }
}

#[test]
fn unreadable_file_is_skipped_not_fatal() {
    let fs = MemoryFilesystem::new()
        .with_file("/tpl/NB/a.swift", "NB")
        .with_file("/tpl/NB/b.swift", "NB")
        .with_unreadable("a.swift");
    let module = ModuleName::parse("MyLib").unwrap();
    let identity = AuthorIdentity::default();
    let job = MaterializeJob {
        payload_dir: Path::new("/tpl/NB"),
        token: "NB",
        module: &module,
        output_dir: Path::new("/out"),
        include_example: true,
        identity: &identity,
    };

    let report = Materializer::new(&fs).materialize(&job).unwrap();

    assert_eq!(report.skipped, vec![PathBuf::from("a.swift")]);
    assert_eq!(report.substituted, vec![PathBuf::from("b.swift")]);
    assert_eq!(
        fs.read_file(Path::new("/out/MyLib/b.swift")).as_deref(),
        Some("MyLib")
    );
}
