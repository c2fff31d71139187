//! The object graph that parsing leaves behind: parent/child placement,
//! supertype resolution, references, aliases, values and flags.

use libadl::{parse, Value};

#[test]
fn test_colours_graph() {
    let r = parse("TOP { Colour : Object { Red = 'red'; Blue = 'blue'; } }");
    assert!(r.is_clean());

    let top = r.store.top();
    let colour = r.store.lookup(top, "Colour").unwrap();
    assert_eq!(r.store.parent(colour), Some(top));
    assert_eq!(r.store.supertype(colour), Some(r.store.object_root()));
    assert_eq!(r.store.aspect(colour), Some(top));

    let red = r.store.lookup(colour, "Red").unwrap();
    let blue = r.store.lookup(colour, "Blue").unwrap();
    assert_eq!(r.store.value(red), Some(&Value::String("red".into())));
    assert_eq!(r.store.value(blue), Some(&Value::String("blue".into())));
    assert!(r.store.is_final(red));
    assert_eq!(r.store.pathname(red), "Colour.Red");
}

#[test]
fn test_first_definition_must_be_top() {
    let r = parse("Colour : Object;");
    assert!(r.is_complete());
    let errs: Vec<_> = r.resolution_errors().collect();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].to_string(), "Top object must be called TOP");
}

#[test]
fn test_top_supertype_must_be_object() {
    let r = parse("TOP : Reference;");
    assert!(r.is_complete());
    let errs: Vec<_> = r.resolution_errors().collect();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].to_string(), "TOP must be Object");
}

#[test]
fn test_reopening_top_is_idempotent() {
    let r = parse("TOP;\nTOP;\nTOP : Object;");
    assert!(r.is_clean());
    // Only the built-ins under TOP; nothing new was created
    assert_eq!(r.store.children(r.store.top()).len(), 4);
}

#[test]
fn test_supertype_conflict_does_not_mutate() {
    let r = parse("TOP { X : Reference; X : Assignment; }");
    assert!(r.is_complete());

    let top = r.store.top();
    let x = r.store.lookup(top, "X").unwrap();
    let reference = r.store.lookup(top, "Reference").unwrap();
    assert_eq!(r.store.supertype(x), Some(reference));

    let errs: Vec<_> = r.resolution_errors().collect();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].to_string(), "Cannot change supertype of X");
}

#[test]
fn test_reference_definitions() {
    let r = parse("TOP { Colour : Object; Ref -> Colour; Multi => Colour; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let reference = r.store.lookup(top, "Reference").unwrap();
    let single = r.store.lookup(top, "Ref").unwrap();
    assert_eq!(r.store.supertype(single), Some(reference));
    assert_eq!(
        r.store.value(single),
        Some(&Value::Reference("Colour".into()))
    );
    let multi = r.store.lookup(top, "Multi").unwrap();
    assert_eq!(r.store.supertype(multi), Some(reference));
}

#[test]
fn test_eponymous_reference_takes_target_name() {
    let r = parse("TOP { Colour : Object; Car : Object { -> Colour; } }");
    assert!(r.is_clean());

    let top = r.store.top();
    let car = r.store.lookup(top, "Car").unwrap();
    let member = r.store.lookup(car, "Colour").unwrap();
    let reference = r.store.lookup(top, "Reference").unwrap();
    assert_eq!(r.store.supertype(member), Some(reference));
    assert_eq!(
        r.store.value(member),
        Some(&Value::Reference("Colour".into()))
    );
}

#[test]
fn test_explicit_ascent_reaches_sibling() {
    let r = parse("TOP { A : Object { Sibling ~= 2; .Sibling = 1; } }");
    assert!(r.is_clean());

    let top = r.store.top();
    let a = r.store.lookup(top, "A").unwrap();
    assert_eq!(r.store.children(a).len(), 1);
    let sibling = r.store.lookup(a, "Sibling").unwrap();
    assert_eq!(r.store.value(sibling), Some(&Value::Number("1".into())));
    assert!(r.store.is_final(sibling));
}

#[test]
fn test_two_level_ascent() {
    let r = parse("TOP { A : Object { Max = 10; B : Object { ..Max = 5; } } }");
    assert!(r.is_clean());

    let top = r.store.top();
    let a = r.store.lookup(top, "A").unwrap();
    let b = r.store.lookup(a, "B").unwrap();
    assert!(r.store.children(b).is_empty());
    let max = r.store.lookup(a, "Max").unwrap();
    assert_eq!(r.store.value(max), Some(&Value::Number("5".into())));
}

#[test]
fn test_alias_lookup_follows_one_hop() {
    let r = parse("TOP { Colour : Object { Red = 'red'; } Hue ! Colour; Crimson : Hue.Red; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let colour = r.store.lookup(top, "Colour").unwrap();
    let hue = r.store.lookup(top, "Hue").unwrap();
    assert_eq!(r.store.alias_for(hue), Some(colour));

    let red = r.store.lookup(colour, "Red").unwrap();
    let crimson = r.store.lookup(top, "Crimson").unwrap();
    assert_eq!(r.store.supertype(crimson), Some(red));
}

#[test]
fn test_alias_chain_collapses_at_definition() {
    let r = parse("TOP { A : Object; B ! A; C ! B; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let a = r.store.lookup(top, "A").unwrap();
    let b = r.store.lookup(top, "B").unwrap();
    let c = r.store.lookup(top, "C").unwrap();
    assert_eq!(r.store.alias_for(b), Some(a));
    // Resolving C's target already followed B's alias, so C points at A
    assert_eq!(r.store.alias_for(c), Some(a));
}

#[test]
fn test_alias_target_ascent_past_root_diagnoses() {
    let r = parse("TOP { Colour : Object; Hue ! .....Colour; }");
    assert!(r.is_complete());
    assert!(!r.is_clean());

    // The object is still defined, but carries no alias link
    let hue = r.store.lookup(r.store.top(), "Hue").unwrap();
    assert_eq!(r.store.alias_for(hue), None);

    let msgs: Vec<String> = r.resolution_errors().map(|d| d.to_string()).collect();
    assert!(msgs.contains(&"Can't find name: .....Colour".to_string()));
}

#[test]
fn test_values_keep_lexical_form() {
    let r = parse(r"TOP { Name = 'a\'b'; Max ~= -1.5; Pat = /+[a-z]/; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let name = r.store.lookup(top, "Name").unwrap();
    assert_eq!(r.store.value(name), Some(&Value::String(r"a\'b".into())));
    assert_eq!(r.store.value(name).unwrap().unescaped().as_deref(), Some("a'b"));

    let max = r.store.lookup(top, "Max").unwrap();
    assert_eq!(r.store.value(max), Some(&Value::Number("-1.5".into())));
    assert!(!r.store.is_final(max));

    let pat = r.store.lookup(top, "Pat").unwrap();
    assert_eq!(r.store.value(pat), Some(&Value::Pegexp("+[a-z]".into())));
}

#[test]
fn test_pathname_value() {
    let r = parse("TOP { Limits : Object { Max = 100; } Default = Limits.Max; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let default = r.store.lookup(top, "Default").unwrap();
    assert_eq!(
        r.store.value(default),
        Some(&Value::Reference("Limits.Max".into()))
    );
}

#[test]
fn test_array_marker() {
    let r = parse("TOP { Tags : Object []; Scores : Object [] = [1, 2]; }");
    assert!(r.is_clean());

    let top = r.store.top();
    let tags = r.store.lookup(top, "Tags").unwrap();
    assert!(r.store.is_array(tags));
    let scores = r.store.lookup(top, "Scores").unwrap();
    assert!(r.store.is_array(scores));
}

#[test]
fn test_anonymous_definition() {
    let r = parse("TOP;\n: Object;");
    assert!(r.is_clean());

    let top = r.store.top();
    assert_eq!(r.store.children(top).len(), 5);
    let anon = *r.store.children(top).last().unwrap();
    assert_eq!(r.store.name(anon), "");
    assert_eq!(r.store.pathname(anon), "<anonymous>");
}

#[test]
fn test_child_skipped_when_parent_fails() {
    let r = parse("TOP { Bad : Missing { Child; } }");
    assert!(r.is_complete());

    let msgs: Vec<String> = r.diagnostics.iter().map(|d| d.to_string()).collect();
    assert!(msgs.contains(&"Child skipped because parent is missing".to_string()));
    assert!(r.store.lookup(r.store.top(), "Bad").is_none());
}

#[test]
fn test_rooted_paths_descend_from_top() {
    let r = parse("TOP;\nTOP.Config : Object;\nTOP.Config.Port = 8080;");
    assert!(r.is_clean());

    let top = r.store.top();
    let config = r.store.lookup(top, "Config").unwrap();
    let port = r.store.lookup(config, "Port").unwrap();
    assert_eq!(r.store.value(port), Some(&Value::Number("8080".into())));
}

#[test]
fn test_eponymous_supertype() {
    let r = parse("TOP { Colour : Object; Car : Object { Colour; } }");
    assert!(r.is_clean());

    let top = r.store.top();
    let colour = r.store.lookup(top, "Colour").unwrap();
    let car = r.store.lookup(top, "Car").unwrap();
    let car_colour = r.store.lookup(car, "Colour").unwrap();
    assert_ne!(car_colour, colour);
    assert_eq!(r.store.supertype(car_colour), Some(colour));
}

#[test]
fn test_multiword_names_merge() {
    let r = parse("TOP { Deep Sea Blue = 'blue'; }");
    assert!(r.is_clean());

    let blue = r.store.lookup(r.store.top(), "Deep Sea Blue").unwrap();
    assert_eq!(r.store.pathname(blue), "Deep Sea Blue");
}

#[test]
fn test_empty_supertype_defaults_to_object() {
    let r = parse("TOP { X : ; }");
    assert!(r.is_clean());

    let x = r.store.lookup(r.store.top(), "X").unwrap();
    assert_eq!(r.store.supertype(x), Some(r.store.object_root()));
}

#[test]
fn test_short_parse_reports_bytes() {
    let r = parse("TOP { X = /abc }");
    assert!(!r.is_complete());
    assert!(r.bytes_consumed < r.input_len);
    assert!(r.syntax_errors().count() >= 1);
}
