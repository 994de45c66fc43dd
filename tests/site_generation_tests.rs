use extcompat::diagnostics::Diagnostic;
use extcompat::error::SiteError;
use extcompat::site::generate_with;
use extcompat::{generate, SiteConfig};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

const INFOS_HEADER: &str = "Extension Name,Functions,Types,Index Access Methods,Storage Managers,Client Authentication,Query Processing,Utility Commands";
const MECHANISMS_HEADER: &str =
    "Extension Name,Memory Allocation,Background Workers,Custom Configuration Variables,Number of Components";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Minimal templates that expose the context fields the tests check
fn write_templates(root: &Path) {
    write(root, "layout/index.html", "home:{{ page_name }}");
    write(
        root,
        "layout/results.html",
        "{% for e in extension_data %}{{ e.name }}={{ e.failure_rate }}|{{ e.has_compatibility_data }};{% endfor %}",
    );
    write(
        root,
        "layout/extension.html",
        "{{ extension_name }} rate={{ failure_rate }} failed={{ failed_extensions|join(',') }} \
         data={{ has_compatibility_data }} desc=[{{ description }}] \
         types={{ extensibility_types|join(',') }} comps={{ system_components|join(',') }} \
         {% for counterpart, entries in terminal_outputs %}<{{ counterpart }}:{% for e in entries %}{{ e.pair }}={{ e.content }};{% endfor %}>{% endfor %}",
    );
}

/// The A/B/C matrix plus metadata for A, B, C and a metadata-only D
fn abc_project(root: &Path) {
    write_templates(root);
    write(
        root,
        "csvs/compatibility.csv",
        "Extension,A,B,C\nA,,no,yes\nB,yes,,no\nC,no,yes,\n",
    );
    write(
        root,
        "csvs/infos.csv",
        &format!(
            "{}\nA,yes,no,no,no,no,no,no\nB,no,yes,no,no,no,no,no\nC,no,no,no,no,no,no,no\nD,no,no,no,no,no,no,yes\n",
            INFOS_HEADER
        ),
    );
    write(
        root,
        "csvs/mechanisms.csv",
        &format!("{}\nA,yes,no,no,1\nD,no,yes,yes,2\n", MECHANISMS_HEADER),
    );
    write(
        root,
        "csvs/source_code.csv",
        "Extension Name,Source Code\nA,https://example.org/a\n",
    );
    write(
        root,
        "csvs/descriptions.csv",
        "Extension Name,Description\nA,First extension\n",
    );
    write(root, "layout/css/custom.css", "body {}");
    write(root, "portraits/a.png", "png");
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(dir).unwrap().display().to_string();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn test_generates_every_page() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);

    let report = generate(&SiteConfig::with_root(root)).unwrap();

    assert_eq!(
        report.pages_written,
        vec!["index.html", "results.html", "A.html", "B.html", "C.html", "D.html"]
    );
    assert!(report.pages_failed.is_empty());
    assert_eq!(report.extensions, 4);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(read(root, "build/index.html"), "home:home");
    assert_eq!(read(root, "build/css/custom.css"), "body {}");
    assert_eq!(read(root, "build/portraits/a.png"), "png");
}

#[test]
fn test_abc_failure_rates() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);

    generate(&SiteConfig::with_root(root)).unwrap();

    let a = read(root, "build/A.html");
    assert!(a.starts_with("A rate=50.0 failed=B,C data=true"), "{}", a);
    assert!(a.contains("types=Functions"));
    assert!(a.contains("comps=Memory Allocation"));

    let results = read(root, "build/results.html");
    assert!(results.starts_with("A=50.0|true;B=50.0|true;C=50.0|true;D=0.0|false;"), "{}", results);
}

#[test]
fn test_blank_cells_lower_failure_rate() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    write(
        root,
        "csvs/compatibility.csv",
        "Extension,A,B,C\nA,,no,\nB,yes,,\nC,,,\n",
    );

    generate(&SiteConfig::with_root(root)).unwrap();

    let a = read(root, "build/A.html");
    assert!(a.starts_with("A rate=25.0 failed=B data=true"), "{}", a);
}

#[test]
fn test_metadata_only_extension() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);

    let report = generate(&SiteConfig::with_root(root)).unwrap();
    assert_eq!(report.without_data, vec!["D"]);

    let d = read(root, "build/D.html");
    assert!(d.starts_with("D rate=0.0 failed= data=false"), "{}", d);
    assert!(d.contains("types=Utility Commands"));
    assert!(d.contains("comps=Background Workers,Custom Configuration Variables"));

    let c = read(root, "build/C.html");
    assert!(c.contains("types=None"));
    assert!(c.contains("comps=None"));
}

#[test]
fn test_descriptions_toggle() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);

    let mut config = SiteConfig::with_root(root);
    generate(&config).unwrap();
    assert!(read(root, "build/A.html").contains("desc=[]"));

    config.include_descriptions = true;
    generate(&config).unwrap();
    assert!(read(root, "build/A.html").contains("desc=[First extension]"));
    assert!(read(root, "build/B.html").contains("desc=[No description available]"));
}

#[test]
fn test_evidence_on_extension_page() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    write(root, "total_compat_output/A_B/terminal.txt", "ERROR: A then B");
    write(root, "total_compat_output/B_A/terminal.txt", "ERROR: B then A");
    write(root, "total_compat_output/C_A/terminal.txt", "ERROR: C then A");

    generate(&SiteConfig::with_root(root)).unwrap();

    let a = read(root, "build/A.html");
    assert!(
        a.contains("<B:A_B=ERROR: A then B;B_A=ERROR: B then A;><C:C_A=ERROR: C then A;>"),
        "{}",
        a
    );
}

#[test]
fn test_rerun_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    write(root, "total_compat_output/A_B/terminal.txt", "log");
    let config = SiteConfig::with_root(root);

    generate(&config).unwrap();
    let first = snapshot(&root.join("build"));
    generate(&config).unwrap();
    let second = snapshot(&root.join("build"));

    assert_eq!(first, second);
    assert!(first.contains_key("css/custom.css"));
}

#[test]
fn test_missing_template_set_aborts_before_output() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    fs::remove_file(root.join("layout/extension.html")).unwrap();

    let err = generate(&SiteConfig::with_root(root)).unwrap_err();
    match err {
        SiteError::MissingTemplateSet { missing, .. } => {
            assert_eq!(missing, vec!["extension.html"])
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!root.join("build").exists());
}

#[test]
fn test_missing_inputs_degrade() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_templates(root);

    let report = generate(&SiteConfig::with_root(root)).unwrap();

    assert_eq!(report.pages_written, vec!["index.html", "results.html"]);
    assert_eq!(report.exit_code(), 0);
    let missing = report
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MissingInput { .. }))
        .count();
    assert_eq!(missing, 5);
    let assets = report
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::MissingAssets { .. }))
        .count();
    assert_eq!(assets, 2);
    assert_eq!(read(root, "build/results.html"), "");
}

#[test]
fn test_page_failure_does_not_stop_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);

    let engine = |template: &str, context: &Value| -> extcompat::error::Result<String> {
        if context["extension_name"] == "B" {
            return Err(SiteError::Template {
                name: template.to_string(),
                message: "boom".to_string(),
            });
        }
        Ok(format!("{}:{}", template, context["page_name"]))
    };

    let report = generate_with(&SiteConfig::with_root(root), &engine).unwrap();

    assert_eq!(report.pages_failed, vec!["B.html"]);
    assert_eq!(
        report.pages_written,
        vec!["index.html", "results.html", "A.html", "C.html", "D.html"]
    );
    assert_eq!(report.exit_code(), 1);
    assert!(!root.join("build/B.html").exists());
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::PageFailed { page, .. } if page == "B.html")));
}

#[test]
fn test_unsafe_page_name_is_rejected() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    write(
        root,
        "csvs/infos.csv",
        &format!("{}\nA,yes,no,no,no,no,no,no\n../evil,no,no,no,no,no,no,no\n", INFOS_HEADER),
    );

    let report = generate(&SiteConfig::with_root(root)).unwrap();

    assert_eq!(report.pages_failed, vec!["../evil"]);
    assert!(report.pages_written.contains(&"A.html".to_string()));
    assert!(!root.join("evil.html").exists());
}

#[test]
fn test_default_layout_renders() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    abc_project(root);
    fs::remove_dir_all(root.join("layout")).unwrap();

    let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("layout");
    for entry in WalkDir::new(&shipped).into_iter().map(|e| e.unwrap()) {
        let dest = root.join("layout").join(entry.path().strip_prefix(&shipped).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).unwrap();
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
    write(root, "total_compat_output/A_B/terminal.txt", "<oops>");

    let mut config = SiteConfig::with_root(root);
    config.include_descriptions = true;
    let report = generate(&config).unwrap();

    assert!(report.pages_failed.is_empty(), "{:?}", report.diagnostics);
    let a = read(root, "build/A.html");
    assert!(a.contains("<h1>A</h1>"));
    assert!(a.contains("Failure rate: 50.0%"));
    assert!(a.contains("&lt;oops&gt;"));
    assert!(read(root, "build/results.html").contains("No compatibility data"));
    assert!(root.join("build/css/custom.css").is_file());
}
