//! Integration tests for the YIN (XML) reader

use yangtree_foundation::ErrorCode;
use yangtree_syntax::{SchemaFormat, parse_source, parse_yang, parse_yin};

const MODULE_YIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<module name="example-system"
        xmlns="urn:ietf:params:xml:ns:yang:yin:1"
        xmlns:ex="urn:example:extensions">
  <namespace uri="urn:example:system"/>
  <prefix value="sys"/>
  <revision date="2024-02-01">
    <description>
      <text>Initial revision.</text>
    </description>
  </revision>
  <container name="system">
    <leaf name="hostname">
      <type name="string"/>
      <ex:secret>true</ex:secret>
    </leaf>
  </container>
</module>
"#;

const MODULE_YANG: &str = r#"module example-system {
  namespace "urn:example:system";
  prefix sys;
  revision 2024-02-01 {
    description "Initial revision.";
  }
  container system {
    leaf hostname {
      type string;
      ex:secret true;
    }
  }
}"#;

#[test]
fn attributes_become_arguments() {
    let module = parse_yin(MODULE_YIN).unwrap();
    assert_eq!(module.keyword, "module");
    assert_eq!(module.argument.as_deref(), Some("example-system"));
    assert_eq!(module.child_arg("namespace"), Some("urn:example:system"));
    assert_eq!(module.child_arg("prefix"), Some("sys"));
}

#[test]
fn text_elements_become_arguments() {
    let module = parse_yin(MODULE_YIN).unwrap();
    let revision = module.child("revision").unwrap();
    assert_eq!(revision.argument.as_deref(), Some("2024-02-01"));
    assert_eq!(revision.child_arg("description"), Some("Initial revision."));
    assert!(revision.child("description").unwrap().children.is_empty());
}

#[test]
fn foreign_namespace_is_extension_instance() {
    let module = parse_yin(MODULE_YIN).unwrap();
    let leaf = module.child("container").unwrap().child("leaf").unwrap();
    let ext = leaf.children.iter().find(|c| c.is_extension_instance()).unwrap();
    assert_eq!(ext.keyword, "ex:secret");
    assert_eq!(ext.argument.as_deref(), Some("true"));
}

#[test]
fn same_shape_as_yang() {
    let from_yin = parse_yin(MODULE_YIN).unwrap();
    let from_yang = parse_yang(MODULE_YANG).unwrap();
    assert_eq!(from_yin.count(), from_yang.count());

    let keywords = |stmt: &yangtree_syntax::Statement| {
        stmt.children.iter().map(|c| c.keyword.clone()).collect::<Vec<_>>()
    };
    assert_eq!(keywords(&from_yin), keywords(&from_yang));
}

#[test]
fn lines_are_tracked() {
    let module = parse_yin(MODULE_YIN).unwrap();
    let container = module.child("container").unwrap();
    assert_eq!(container.span.line, 12);
}

#[test]
fn missing_attribute_is_validation() {
    let err = parse_yin(
        r#"<module name="m" xmlns="urn:ietf:params:xml:ns:yang:yin:1"><prefix/></module>"#,
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
}

#[test]
fn malformed_xml_is_rejected() {
    assert!(parse_yin("<module name=\"m\"><prefix value=\"p\"></module>").is_err());
    assert!(parse_yin("").is_err());
}

#[test]
fn parse_source_reads_yin() {
    let stmt = parse_source(MODULE_YIN, SchemaFormat::Yin).unwrap();
    assert_eq!(stmt.argument.as_deref(), Some("example-system"));
}
