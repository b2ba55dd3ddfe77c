use super::ast::List;

/// Serialize an AST to a pretty-printed JSON string.
pub fn to_pretty_json(list: &List) -> String {
    serde_json::to_string_pretty(list).expect("List serialization cannot fail")
}
