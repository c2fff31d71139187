//! What the grammar engine reports: event order, spans, and syntax
//! diagnostics, observed through the recording sink.

use libadl::trace_events;

fn as_strs(events: &[String]) -> Vec<&str> {
    events.iter().map(String::as_str).collect()
}

#[test]
fn test_definition_event_order() {
    let (events, diags) = trace_events("TOP { Red = 'red'; }");
    assert!(diags.is_empty());
    assert_eq!(
        as_strs(&events),
        vec![
            "definition starts",
            "name 'TOP'",
            "pathname ok",
            "object name",
            "block start",
            "definition starts",
            "name 'Red'",
            "pathname ok",
            "object name",
            "string 'red'",
            "assignment =",
            "definition ends",
            "block end",
            "definition ends",
        ]
    );
}

#[test]
fn test_ascend_and_descend_counts() {
    let (events, diags) = trace_events("TOP { A.B.C; ..X; }");
    assert!(diags.is_empty());
    assert_eq!(events.iter().filter(|e| *e == "descend").count(), 2);
    assert_eq!(events.iter().filter(|e| *e == "ascend").count(), 2);
}

#[test]
fn test_multiword_name_events() {
    let (events, diags) = trace_events("TOP { Deep Sea Blue; }");
    assert!(diags.is_empty());
    // One event per word; merging into a segment is the consumer's job
    assert!(events.contains(&"name 'Deep'".to_string()));
    assert!(events.contains(&"name 'Sea'".to_string()));
    assert!(events.contains(&"name 'Blue'".to_string()));
    assert_eq!(events.iter().filter(|e| *e == "descend").count(), 0);
}

#[test]
fn test_string_span_keeps_escapes() {
    let (events, diags) = trace_events(r"TOP { X = 'a\'b'; }");
    assert!(diags.is_empty());
    assert!(events.contains(&r"string 'a\'b'".to_string()));
}

#[test]
fn test_pegexp_span() {
    let (events, diags) = trace_events(r"TOP { P = /+[a-z]\d/; }");
    assert!(diags.is_empty());
    assert!(events.contains(&r"pegexp /+[a-z]\d/".to_string()));
}

#[test]
fn test_reference_events() {
    let (events, diags) = trace_events("TOP { Ref => Colour; }");
    assert!(diags.is_empty());
    assert!(events.contains(&"reference =>".to_string()));
    assert!(events.contains(&"reference done".to_string()));
}

#[test]
fn test_alias_event() {
    let (events, diags) = trace_events("TOP { Hue ! Colour; }");
    assert!(diags.is_empty());
    assert!(events.contains(&"alias".to_string()));
}

#[test]
fn test_empty_supertype_still_signals() {
    let (events, diags) = trace_events("TOP { X : ; }");
    assert!(diags.is_empty());
    assert!(events.contains(&"pathname none".to_string()));
    assert!(events.contains(&"supertype".to_string()));
}

#[test]
fn test_array_and_tentative_events() {
    let (events, diags) = trace_events("TOP { Tags : Object [] ~= [1, 2]; }");
    assert!(diags.is_empty());
    assert!(events.contains(&"is array".to_string()));
    assert!(events.contains(&"assignment ~=".to_string()));
    assert_eq!(events.iter().filter(|e| *e == "number 1").count(), 1);
    assert_eq!(events.iter().filter(|e| *e == "number 2").count(), 1);
}

#[test]
fn test_unterminated_pegexp_reports() {
    let (_, diags) = trace_events("TOP { X = /abc }");
    assert!(!diags.is_empty());
    assert!(diags[0]
        .to_string()
        .starts_with("1:15, Pegexp MISSING closing /:"));
}

#[test]
fn test_missing_value_reports() {
    let (_, diags) = trace_events("TOP { X ~= ; }");
    assert!(diags
        .iter()
        .any(|d| d.to_string().contains("tentative_assignment MISSING value")));
}

#[test]
fn test_bom_is_skipped() {
    let (events, diags) = trace_events("\u{FEFF}TOP;");
    assert!(diags.is_empty());
    assert!(events.contains(&"name 'TOP'".to_string()));
}

#[test]
fn test_comments_are_space() {
    let (events, diags) = trace_events("// heading\nTOP { // inner\n}\n");
    assert!(diags.is_empty());
    assert!(events.contains(&"block end".to_string()));
}
