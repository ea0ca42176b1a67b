//! Integration tests for pdf-actiontags.
//!
//! These drive the public API end to end on small forms shaped like real
//! host metadata. Run with:
//!   cargo test --test filter

use pdf_actiontags::pipeline::input::{load_metadata, load_records, write_json};
use pdf_actiontags::{
    apply_pdf_actiontags, tag_param, DirectiveIssue, ExclusionReason, FieldDescriptor,
    FilterConfig, RecordData, RenderMode,
};
use std::io::Write;
use tracing_subscriber::EnvFilter;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Route library logs to the test harness; `RUST_LOG=pdf_actiontags=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn records(json: &str) -> RecordData {
    serde_json::from_str(json).expect("test records must be valid JSON")
}

fn run(fields: &[FieldDescriptor], data: RecordData) -> pdf_actiontags::FilterOutput {
    init_tracing();
    apply_pdf_actiontags(fields, data, &FilterConfig::default())
}

fn stored<'a>(data: &'a RecordData, record: &str, event: &str, field: &str) -> &'a str {
    data.get(record)
        .and_then(|e| e.get(event))
        .and_then(|v| v.get(field))
        .map(String::as_str)
        .unwrap_or_else(|| panic!("no value at {record}/{event}/{field}"))
}

/// Assert `sub` is `full` with some items removed, relative order kept.
fn assert_subsequence(sub: &[&str], full: &[&str]) {
    let mut it = full.iter();
    for name in sub {
        assert!(
            it.any(|f| f == name),
            "{name} is out of order or missing; output {sub:?}, input {full:?}"
        );
    }
}

/// A demographics form exercising every tag.
fn demographics() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("record_id", "text")
            .with_label("Record ID")
            .with_misc("@HIDDEN-PDF"),
        FieldDescriptor::new("name", "text").with_label("Name"),
        FieldDescriptor::new("sex", "radio")
            .with_label("Sex")
            .with_enum(r"1, Male \n 2, Female")
            .with_misc("@PDF-NOENUM"),
        FieldDescriptor::new("smoker", "select")
            .with_label("Smoker")
            .with_enum(r"0, No \n 1, Yes")
            .with_misc("@PDF-DATANOENUM"),
        FieldDescriptor::new("comments", "notes")
            .with_label("Comments")
            .with_note("Optional")
            .with_misc(r#"@PDF-WHITESPACE="3" @PDF-FIELDNOTEEMPTY="Use block letters""#),
        FieldDescriptor::new("consent_dt", "text")
            .with_label("Consent date")
            .with_misc(r#"@PDF-FIELDNOTEDATA="Confirmed""#),
        FieldDescriptor::new("consent_hint", "descriptive")
            .with_label("Remember to obtain consent")
            .with_misc(r#"@PDF-HIDDENDATA="consent_dt""#),
        FieldDescriptor::new("followup_only", "text")
            .with_label("Follow-up notes")
            .with_misc("@PDF-HIDDENNODATA"),
    ]
}

// ── Mode detection ───────────────────────────────────────────────────────────

#[test]
fn empty_data_is_empty_template() {
    let out = run(&demographics(), RecordData::new());
    assert_eq!(out.report.mode, RenderMode::EmptyTemplate);
}

#[test]
fn placeholder_record_is_empty_template() {
    let out = run(&demographics(), records(r#"{"": {"": {"name": ""}}}"#));
    assert_eq!(out.report.mode, RenderMode::EmptyTemplate);
}

#[test]
fn saved_record_is_with_data() {
    let out = run(&demographics(), records(r#"{"17": {"baseline": {"name": "Ada"}}}"#));
    assert_eq!(out.report.mode, RenderMode::WithData);
}

// ── Whole-form passes ────────────────────────────────────────────────────────

#[test]
fn empty_template_pass() {
    let out = run(&demographics(), RecordData::new());

    assert_eq!(
        out.field_names(),
        vec!["name", "sex", "smoker", "comments", "consent_dt", "consent_hint"]
    );

    let sex = &out.fields[1];
    assert_eq!(sex.element_type, "text", "NOENUM always retypes");
    let smoker = &out.fields[2];
    assert_eq!(smoker.element_type, "select", "DATANOENUM needs a value");
    assert_eq!(smoker.element_enum, r"0, No \n 1, Yes");

    let comments = &out.fields[3];
    assert_eq!(comments.element_label, "Comments\n\n\n");
    assert_eq!(comments.element_note, "Use block letters");

    assert!(out.report.issues.is_empty(), "{:?}", out.report.issues);
    assert_eq!(
        out.report.decision("followup_only").and_then(|d| d.reason),
        Some(ExclusionReason::HiddenNoData)
    );
}

#[test]
fn with_data_pass() {
    let data = records(
        r#"{"17": {"baseline": {
            "record_id": "17", "name": "Ada", "sex": "2", "smoker": "1",
            "comments": "", "consent_dt": "2024-03-01", "followup_only": ""
        }}}"#,
    );
    let out = run(&demographics(), data);

    assert_eq!(
        out.field_names(),
        vec!["name", "sex", "smoker", "comments", "consent_dt", "followup_only"]
    );
    assert_eq!(
        out.report.decision("consent_hint").and_then(|d| d.reason),
        Some(ExclusionReason::HiddenData)
    );

    assert_eq!(stored(&out.records, "17", "baseline", "sex"), "Female");
    assert_eq!(stored(&out.records, "17", "baseline", "smoker"), "Yes");
    assert_eq!(stored(&out.records, "17", "baseline", "name"), "Ada");

    let comments = &out.fields[3];
    assert_eq!(comments.element_label, "Comments", "WHITESPACE is template-only");
    assert_eq!(comments.element_note, "Optional", "FIELDNOTEEMPTY is template-only");
    assert_eq!(out.fields[4].element_note, "Confirmed");

    assert_eq!(out.report.stats.values_rewritten, 2);
    assert_eq!(out.report.stats.retyped_fields, 2);
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn output_is_subsequence_of_input() {
    let fields = demographics();
    let input: Vec<&str> = fields.iter().map(|f| f.field_name.as_str()).collect();
    for data in [
        RecordData::new(),
        records(r#"{"1": {"e": {"consent_dt": "x"}}}"#),
        records(r#"{"1": {"e": {"sex": "1"}}, "2": {"e": {"smoker": "0"}}}"#),
    ] {
        let out = run(&fields, data);
        assert_subsequence(&out.field_names(), &input);
    }
}

#[test]
fn hidden_pdf_takes_precedence() {
    let fields = vec![FieldDescriptor::new("a", "radio")
        .with_enum(r"1, Yes")
        .with_misc(r#"@PDF-HIDDENNODATA="a" @HIDDEN-PDF @PDF-NOENUM"#)];
    let out = run(&fields, records(r#"{"1": {"e": {"a": "1"}}}"#));
    assert!(out.fields.is_empty());
    assert_eq!(stored(&out.records, "1", "e", "a"), "1", "no substitution on hidden fields");
}

#[test]
fn hidden_pdf_written_right_after_another_tag() {
    let fields = vec![
        FieldDescriptor::new("a", "radio")
            .with_enum(r"1, Yes")
            .with_misc("@PDF-NOENUM@HIDDEN-PDF"),
        FieldDescriptor::new("b", "text"),
    ];
    let out = run(&fields, RecordData::new());
    assert_eq!(out.field_names(), vec!["b"]);
    assert_eq!(
        out.report.decision("a").and_then(|d| d.reason),
        Some(ExclusionReason::HiddenPdf)
    );
}

#[test]
fn whitespace_over_limit_is_reported() {
    let fields = vec![FieldDescriptor::new("a", "notes").with_misc(r#"@PDF-WHITESPACE="250""#)];
    let out = run(&fields, RecordData::new());
    assert_eq!(out.fields[0].element_label, "\n".repeat(200));
    assert_eq!(
        out.report.issues,
        vec![DirectiveIssue::WhitespaceClamped {
            field: "a".into(),
            requested: 250,
            applied: 200,
        }]
    );
}

#[test]
fn hidden_no_data_bare() {
    let fields = vec![FieldDescriptor::new("a", "text").with_misc("@PDF-HIDDENNODATA")];
    assert!(run(&fields, RecordData::new()).fields.is_empty());
    assert_eq!(
        run(&fields, records(r#"{"1": {"e": {"other": "1"}}}"#)).field_names(),
        vec!["a"]
    );
}

#[test]
fn hidden_data_with_target() {
    let fields = vec![
        FieldDescriptor::new("a", "text").with_misc(r#"@PDF-HIDDENDATA="b""#),
        FieldDescriptor::new("b", "text"),
    ];
    let with_b = run(&fields, records(r#"{"1": {"e": {"b": "yes"}}}"#));
    assert_eq!(with_b.field_names(), vec!["b"]);

    let without_b = run(&fields, records(r#"{"1": {"e": {"b": "", "a": "x"}}}"#));
    assert_eq!(without_b.field_names(), vec!["a", "b"]);
}

#[test]
fn presence_uses_last_non_empty_value() {
    let fields = vec![
        FieldDescriptor::new("a", "text").with_misc(r#"@PDF-HIDDENNODATA="b""#),
        FieldDescriptor::new("b", "text"),
    ];
    // b has a value in an earlier event only; still counts as present.
    let out = run(
        &fields,
        records(r#"{"1": {"e1": {"b": "x"}, "e2": {"b": ""}}, "2": {"e1": {}}}"#),
    );
    assert_eq!(out.field_names(), vec!["a", "b"]);
}

#[test]
fn whitespace_template_only() {
    let fields = vec![FieldDescriptor::new("a", "notes")
        .with_label("L")
        .with_misc(r#"@PDF-WHITESPACE="3""#)];
    assert_eq!(run(&fields, RecordData::new()).fields[0].element_label, "L\n\n\n");
    assert_eq!(
        run(&fields, records(r#"{"1": {"e": {"other": "1"}}}"#)).fields[0].element_label,
        "L"
    );
}

#[test]
fn noenum_with_value() {
    let fields = vec![FieldDescriptor::new("q", "radio")
        .with_enum(r"1,Yes\n2,No")
        .with_misc("@PDF-NOENUM")];
    let out = run(&fields, records(r#"{"1": {"e": {"q": "2"}}}"#));
    assert_eq!(out.fields[0].element_type, "text");
    assert_eq!(stored(&out.records, "1", "e", "q"), "No");
}

#[test]
fn noenum_without_value() {
    let fields = vec![FieldDescriptor::new("q", "radio")
        .with_enum(r"1,Yes\n2,No")
        .with_misc("@PDF-NOENUM")];
    let out = run(&fields, records(r#"{"1": {"e": {"q": "", "z": "1"}}}"#));
    assert_eq!(out.field_names(), vec!["q"]);
    assert_eq!(out.fields[0].element_type, "text");
    assert!(out.report.edits.is_empty());
}

#[test]
fn datanoenum_gating() {
    let fields = vec![FieldDescriptor::new("q", "radio")
        .with_enum(r"1,Yes\n2,No")
        .with_misc("@PDF-DATANOENUM")];
    let out = run(&fields, records(r#"{"1": {"e": {"q": "", "z": "1"}}}"#));
    assert_eq!(out.fields[0], fields[0], "descriptor must be untouched");

    let out = run(&fields, records(r#"{"1": {"e": {"q": "1"}}}"#));
    assert_eq!(out.fields[0].element_type, "text");
    assert_eq!(stored(&out.records, "1", "e", "q"), "Yes");
}

#[test]
fn fieldnotedata_requires_value() {
    let fields = vec![
        FieldDescriptor::new("a", "text")
            .with_note("n")
            .with_misc(r#"@PDF-FIELDNOTEDATA="Confirmed""#),
        FieldDescriptor::new("b", "text"),
    ];
    let out = run(&fields, records(r#"{"1": {"e": {"b": "1"}}}"#));
    assert_eq!(out.fields[0].element_note, "n");
}

#[test]
fn rerun_on_output_keeps_same_fields() {
    let fields = demographics();
    let data = records(
        r#"{"17": {"baseline": {"name": "Ada", "sex": "2", "smoker": "1", "consent_dt": "x"}}}"#,
    );
    let first = run(&fields, data);
    let second = run(&first.fields, first.records.clone());
    assert_eq!(second.field_names(), first.field_names());
    assert_eq!(second.records, first.records);
    assert_eq!(second.report.stats.values_rewritten, 0);
}

// ── Degradation ──────────────────────────────────────────────────────────────

#[test]
fn malformed_directives_degrade_quietly() {
    let fields = vec![
        FieldDescriptor::new("a", "text").with_misc(r#"@PDF-HIDDENDATA="unterminated"#),
        FieldDescriptor::new("b", "text").with_misc(r#"@PDF-WHITESPACE="lots""#),
        FieldDescriptor::new("c", "text").with_misc(r#"@PDF-HIDDENNODATA="ghost""#),
        FieldDescriptor::new("d", "radio")
            .with_enum(r"1,Yes")
            .with_misc("@PDF-NOENUM"),
    ];
    let out = run(&fields, records(r#"{"1": {"e": {"d": "7"}}}"#));

    // Unterminated target falls back to the bare form: hidden with data.
    assert_eq!(out.field_names(), vec!["b", "c", "d"]);
    assert_eq!(stored(&out.records, "1", "e", "d"), "7");

    let kinds: Vec<&str> = out
        .report
        .issues
        .iter()
        .map(|i| match i {
            DirectiveIssue::MalformedParameter { .. } => "malformed",
            DirectiveIssue::InvalidWhitespaceCount { .. } => "whitespace",
            DirectiveIssue::UnknownTarget { .. } => "target",
            DirectiveIssue::UnmatchedEnumKey { .. } => "enum",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["malformed", "whitespace", "target", "enum"]);
}

#[test]
fn substring_lookalikes_are_not_tags() {
    let fields = vec![
        FieldDescriptor::new("a", "text").with_misc("@HIDDEN-PDF-LATER"),
        FieldDescriptor::new("b", "text").with_misc("contact admin@HIDDEN-PDF"),
    ];
    assert_eq!(run(&fields, RecordData::new()).field_names(), vec!["a", "b"]);
}

#[test]
fn tag_param_extraction() {
    let misc = r#"@DEFAULT='1' @PDF-FIELDNOTEEMPTY='Sign here' @PDF-HIDDENDATA"#;
    assert_eq!(tag_param(misc, "PDF-FIELDNOTEEMPTY"), Some("Sign here"));
    assert_eq!(tag_param(misc, "PDF-HIDDENDATA"), None);
    assert_eq!(tag_param(misc, "PDF-WHITESPACE"), None);
}

// ── File round-trip ──────────────────────────────────────────────────────────

#[test]
fn load_filter_write() {
    let dir = tempfile::tempdir().unwrap();
    let meta_path = dir.path().join("metadata.json");
    let data_path = dir.path().join("data.json");
    let out_path = dir.path().join("out.json");

    let mut meta = std::fs::File::create(&meta_path).unwrap();
    write!(
        meta,
        r#"[
          {{"field_name": "id", "element_type": "text", "misc": "@HIDDEN-PDF", "form_name": "f"}},
          {{"field_name": "q", "element_type": "radio", "element_enum": "1, Yes \\n 0, No",
            "element_label": "Q", "element_note": null, "misc": "@PDF-NOENUM", "form_name": "f"}}
        ]"#
    )
    .unwrap();
    std::fs::write(&data_path, r#"{"9": {"arm_1": {"id": "9", "q": "0"}}}"#).unwrap();

    let fields = load_metadata(&meta_path).unwrap();
    let data = load_records(&data_path).unwrap();
    let out = run(&fields, data);
    write_json(&out_path, &out).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["fields"][0]["field_name"], "q");
    assert_eq!(written["fields"][0]["element_type"], "text");
    assert_eq!(written["fields"][0]["form_name"], "f");
    assert_eq!(written["records"]["9"]["arm_1"]["q"], "No");
    assert_eq!(written["report"]["mode"], "with_data");
}
