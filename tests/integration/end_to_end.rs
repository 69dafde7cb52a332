//! Integration tests for whole-module compilation

use yangtree_compiler::{Input, ModuleRegistry};
use yangtree_foundation::{ErrorCode, MemorySink, Severity};
use yangtree_schema::{BuiltinType, CompiledBody, CompiledKind};
use yangtree_syntax::SchemaFormat;

use crate::{node_at, registry_with};

const INET: &str = r#"module example-inet {
  namespace "urn:example:inet";
  prefix inet;
  revision 2024-03-01;

  typedef port-number {
    type uint16 { range "0..65535"; }
  }
  typedef ip-address {
    type string;
  }
  grouping endpoint {
    leaf address { type ip-address; }
    leaf port { type port-number; }
  }
}"#;

const SERVICES: &str = r#"module example-services {
  yang-version 1.1;
  namespace "urn:example:services";
  prefix svc;

  import example-inet { prefix inet; }

  feature tls;

  typedef service-port {
    type inet:port-number;
    default 8080;
    units "port";
  }

  container services {
    description "Configured services.";
    list service {
      key "name";
      leaf name { type string; }
      leaf port { type service-port; }
      container listen {
        uses inet:endpoint {
          refine port { default 443; }
        }
      }
      choice transport {
        default tcp;
        leaf tcp { type empty; }
        case secure {
          if-feature tls;
          leaf certificate { type string; }
        }
      }
      action restart {
        input { leaf delay { type uint32; } }
      }
    }
  }

  container state {
    config false;
    leaf uptime { type uint64; }
  }

  rpc reload {
    output { leaf ok { type boolean; } }
  }

  notification service-down {
    leaf name { type string; }
  }

  augment "/svc:services/svc:service" {
    leaf owner { type string; }
  }
}"#;

fn services_registry() -> ModuleRegistry {
    registry_with(&[("example-inet", INET), ("example-services", SERVICES)])
}

// =============================================================================
// Compiled Tree
// =============================================================================

#[test]
fn compiles_module_with_import() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();

    let entry = registry.get(id).unwrap();
    assert!(entry.is_implemented());
    let module = entry.compiled().unwrap();
    assert_eq!(module.namespace, "urn:example:services");
    assert_eq!(module.features, ["tls"]);
    assert_eq!(module.data.len(), 2);
    assert_eq!(module.rpcs.len(), 1);
    assert_eq!(module.notifications.len(), 1);

    let inet = registry.find("example-inet", None).unwrap();
    assert!(!registry.get(inet).unwrap().is_implemented());
    assert_eq!(registry.resolve_prefix(id, "inet"), Some(inet));
}

#[test]
fn typedef_chain_across_modules() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();
    let module = registry.compiled(id).unwrap();

    let port = node_at(module, "services/service/port");
    let CompiledBody::Leaf { ty, default, units, .. } = &port.body else {
        panic!("expected a leaf");
    };
    assert_eq!(ty.base, BuiltinType::Uint16);
    let chain: Vec<(&str, &str)> = ty
        .derived_from
        .iter()
        .map(|o| (o.name.as_str(), o.module.as_str()))
        .collect();
    assert_eq!(
        chain,
        [("service-port", "example-services"), ("port-number", "example-inet")]
    );
    assert_eq!(default.as_deref(), Some("8080"));
    assert_eq!(units.as_deref(), Some("port"));
    assert_eq!(ty.restrictions.len(), 1);
}

#[test]
fn imported_grouping_is_instantiated_with_refine() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();
    let module = registry.compiled(id).unwrap();

    let port = node_at(module, "services/service/listen/port");
    assert_eq!(port.module, id);
    let CompiledBody::Leaf { ty, default, .. } = &port.body else {
        panic!("expected a leaf");
    };
    assert_eq!(default.as_deref(), Some("443"));
    assert_eq!(ty.derived_from[0].module, "example-inet");

    let address = node_at(module, "services/service/listen/address");
    assert_eq!(address.kind(), CompiledKind::Leaf);
}

#[test]
fn choice_cases_and_conditions() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();
    let module = registry.compiled(id).unwrap();

    let transport = node_at(module, "services/service/transport");
    let CompiledBody::Choice { default, children, .. } = &transport.body else {
        panic!("expected a choice");
    };
    assert_eq!(default.as_deref(), Some("tcp"));
    assert_eq!(children.len(), 2);
    for case in children {
        assert_eq!(module.node(*case).kind(), CompiledKind::Case);
    }

    let secure = node_at(module, "services/service/transport/secure");
    assert_eq!(secure.if_features, ["tls"]);
    let tcp_case = node_at(module, "services/service/transport/tcp/tcp");
    assert_eq!(tcp_case.kind(), CompiledKind::Leaf);
}

#[test]
fn config_and_operations() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();
    let module = registry.compiled(id).unwrap();

    assert!(node_at(module, "services/service/name").config);
    assert!(!node_at(module, "state/uptime").config);

    let restart = node_at(module, "services/service/restart");
    assert_eq!(restart.kind(), CompiledKind::Action);
    let delay = node_at(module, "services/service/restart/input/delay");
    assert_eq!(delay.kind(), CompiledKind::Leaf);

    let ok = node_at(module, "reload/output/ok");
    let CompiledBody::Leaf { ty, .. } = &ok.body else {
        panic!("expected a leaf");
    };
    assert_eq!(ty.base, BuiltinType::Boolean);
    assert_eq!(node_at(module, "service-down/name").kind(), CompiledKind::Leaf);
}

#[test]
fn own_augment_is_applied() {
    let mut registry = services_registry();
    let id = registry.load("example-services", None, true, false).unwrap();
    let module = registry.compiled(id).unwrap();

    let owner = node_at(module, "services/service/owner");
    assert_eq!(owner.kind(), CompiledKind::Leaf);
    assert!(owner.config);
}

// =============================================================================
// Atomic Failure
// =============================================================================

#[test]
fn unresolvable_prefix_installs_nothing() {
    let sink = MemorySink::new();
    let mut registry = ModuleRegistry::in_memory().with_sink(sink.clone());
    let err = registry
        .parse_module(
            Input::memory(
                "module broken { namespace urn:broken; prefix b; \
                 container c { leaf x { type nope:thing; } } }",
            ),
            SchemaFormat::Yang,
            true,
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(registry.find("broken", None).is_none());
    assert!(registry.is_empty());
    assert_eq!(sink.with_severity(Severity::Error).len(), 1);
}

#[test]
fn late_compile_error_installs_nothing() {
    let mut registry = services_registry();
    let err = registry
        .parse_module(
            Input::memory(
                "module late { namespace urn:late; prefix l; import example-inet { prefix inet; } \
                 leaf first { type inet:port-number; } \
                 container c { uses missing-grouping; } }",
            ),
            SchemaFormat::Yang,
            true,
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(registry.find("late", None).is_none());
}

#[test]
fn parsed_only_module_skips_compilation_errors() {
    let mut registry = ModuleRegistry::in_memory();
    let text = "module lazy { namespace urn:lazy; prefix l; leaf x { type nope:thing; } }";
    let id = registry
        .parse_module(Input::memory(text), SchemaFormat::Yang, false)
        .unwrap();
    assert!(registry.compiled(id).is_none());
    assert_eq!(registry.implement(id).unwrap_err().code(), ErrorCode::NotFound);
}

#[test]
fn parse_errors_are_validation() {
    let mut registry = ModuleRegistry::in_memory();
    let err = registry
        .parse_module(Input::memory("module m { namespace urn:m"), SchemaFormat::Yang, true)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
}

#[test]
fn mandatory_leaf_with_default_is_rejected() {
    let mut registry = ModuleRegistry::in_memory();
    let err = registry
        .parse_module(
            Input::memory(
                "module m {\n namespace urn:m;\n prefix m;\n leaf x {\n  type string;\n  mandatory true;\n  default a;\n }\n}",
            ),
            SchemaFormat::Yang,
            true,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.line(), Some(4));
}

// =============================================================================
// Mixed Syntaxes
// =============================================================================

#[test]
fn yin_module_imports_yang_module() {
    let yin = r#"<module name="example-client"
        xmlns="urn:ietf:params:xml:ns:yang:yin:1">
  <namespace uri="urn:example:client"/>
  <prefix value="cl"/>
  <import module="example-inet">
    <prefix value="inet"/>
  </import>
  <container name="client">
    <uses name="inet:endpoint"/>
  </container>
</module>"#;
    let mut registry = services_registry();
    let id = registry
        .parse_module(Input::memory(yin), SchemaFormat::Yin, true)
        .unwrap();
    let module = registry.compiled(id).unwrap();

    let port = node_at(module, "client/port");
    let CompiledBody::Leaf { ty, .. } = &port.body else {
        panic!("expected a leaf");
    };
    assert_eq!(ty.base, BuiltinType::Uint16);
}
