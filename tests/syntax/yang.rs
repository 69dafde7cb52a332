//! Integration tests for the YANG compact syntax reader

use yangtree_foundation::ErrorCode;
use yangtree_syntax::{Lexer, SchemaFormat, TokenKind, parse_source, parse_yang};

const INTERFACES: &str = r#"
module example-interfaces {
  yang-version 1.1;
  namespace "urn:example:interfaces";
  prefix if;

  import ietf-yang-types { prefix yang; revision-date 2013-07-15; }

  revision 2024-01-10 {
    description "Second revision.";
  }
  revision 2023-05-01;

  // Interface list.
  container interfaces {
    list interface {
      key "name";
      leaf name { type string; }
      leaf mtu {
        type uint16 { range "68..max"; }
        default 1500;
      }
    }
  }
}
"#;

// =============================================================================
// Statement Trees
// =============================================================================

#[test]
fn reads_module_tree() {
    let module = parse_yang(INTERFACES).unwrap();
    assert_eq!(module.keyword, "module");
    assert_eq!(module.argument.as_deref(), Some("example-interfaces"));
    assert_eq!(module.child_arg("namespace"), Some("urn:example:interfaces"));
    assert_eq!(module.child_arg("prefix"), Some("if"));
    assert_eq!(module.children_with("revision").count(), 2);

    let import = module.child("import").unwrap();
    assert_eq!(import.child_arg("revision-date"), Some("2013-07-15"));
}

#[test]
fn nested_statements_keep_lines() {
    let module = parse_yang(INTERFACES).unwrap();
    let container = module.child("container").unwrap();
    let list = container.child("list").unwrap();
    let mtu = list.children_with("leaf").nth(1).unwrap();

    assert_eq!(mtu.argument.as_deref(), Some("mtu"));
    assert_eq!(mtu.span.line, 19);
    assert_eq!(mtu.child("type").unwrap().child_arg("range"), Some("68..max"));
}

#[test]
fn count_includes_every_statement() {
    let module = parse_yang("module m { leaf a { type string; } leaf b; }").unwrap();
    assert_eq!(module.count(), 4);
}

#[test]
fn concatenated_strings_are_joined() {
    let module = parse_yang(r#"module m { description "one " + 'two' + "three"; }"#).unwrap();
    assert_eq!(module.child_arg("description"), Some("one twothree"));
}

#[test]
fn escapes_in_double_quotes() {
    let module = parse_yang(r#"module m { description "a\tb\n\"c\"\\"; }"#).unwrap();
    assert_eq!(module.child_arg("description"), Some("a\tb\n\"c\"\\"));
}

#[test]
fn single_quotes_are_literal() {
    let module = parse_yang(r"module m { pattern '\d+'; }").unwrap();
    assert_eq!(module.child_arg("pattern"), Some(r"\d+"));
}

#[test]
fn extension_instances_are_prefixed() {
    let module = parse_yang("module m { ex:annotation value { ex:nested; } }").unwrap();
    let ext = &module.children[0];
    assert!(ext.is_extension_instance());
    assert_eq!(ext.argument.as_deref(), Some("value"));
    assert!(ext.children[0].is_extension_instance());
}

#[test]
fn missing_argument_is_validation() {
    let module = parse_yang("module m { prefix; }").unwrap();
    let err = module.child("prefix").unwrap().arg().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
}

// =============================================================================
// Syntax Errors
// =============================================================================

#[test]
fn unterminated_block() {
    let err = parse_yang("module m {\n  leaf a { type string; }\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn missing_terminator() {
    assert!(parse_yang("module m { leaf a }").is_err());
}

#[test]
fn trailing_statement_rejected() {
    assert!(parse_yang("module a { } module b { }").is_err());
}

#[test]
fn empty_input_rejected() {
    assert!(parse_yang("  // nothing here\n").is_err());
}

#[test]
fn invalid_escape_rejected() {
    assert!(parse_yang(r#"module m { description "bad \q"; }"#).is_err());
}

#[test]
fn plus_needs_quoted_operand() {
    assert!(parse_yang(r#"module m { description "a" + b; }"#).is_err());
}

// =============================================================================
// Lexer
// =============================================================================

#[test]
fn lexer_ends_with_eof() {
    let tokens = Lexer::tokenize_all("leaf a;");
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn lexer_recognizes_punctuation() {
    let kinds: Vec<TokenKind> = Lexer::tokenize_all("a { b; }")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Word("a".into()),
            TokenKind::LBrace,
            TokenKind::Word("b".into()),
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

// =============================================================================
// Format Dispatch
// =============================================================================

#[test]
fn format_from_extension() {
    assert_eq!(SchemaFormat::from_extension("yang"), Some(SchemaFormat::Yang));
    assert_eq!(SchemaFormat::from_extension("yin"), Some(SchemaFormat::Yin));
    assert_eq!(SchemaFormat::from_extension("xml"), None);
    assert_eq!(SchemaFormat::Yin.extension(), "yin");
}

#[test]
fn parse_source_dispatches_on_format() {
    let stmt = parse_source("submodule s { belongs-to m { prefix m; } }", SchemaFormat::Yang).unwrap();
    assert_eq!(stmt.keyword, "submodule");
}
