//! Integration tests for built-in types

use yangtree_schema::BuiltinType;

#[test]
fn prefixed_and_unknown_names_are_not_builtin() {
    assert_eq!(BuiltinType::from_name("yang:counter32"), None);
    assert_eq!(BuiltinType::from_name("percent"), None);
    assert_eq!(BuiltinType::from_name("String"), None);
}

#[test]
fn spot_check_names() {
    assert_eq!(BuiltinType::InstanceIdentifier.name(), "instance-identifier");
    assert_eq!(BuiltinType::IdentityRef.name(), "identityref");
    assert_eq!(BuiltinType::from_name("leafref"), Some(BuiltinType::Leafref));
}
