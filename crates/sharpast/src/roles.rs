//! Role annotations keyed by type tag.
//!
//! When enabled, the projector adds an `@role` array after `@type` on every
//! object whose tag has an entry in the [`RoleTable`]. Roles are coarse,
//! language-neutral labels (`Operator`, `Literal`, `If`, `Declaration`) that
//! let consumers find "all loops" or "all arithmetic" without knowing each
//! grammar's tag names.
//!
//! The built-in table covers the C# tags (and the operator, keyword and
//! refined-expression tags Rust shares with it). Configuration entries
//! replace built-in ones; an empty list removes a tag from the table.

use std::collections::{BTreeMap, HashMap};

/// Key holding the role list in projected objects.
pub const ROLE_KEY: &str = "@role";

/// Built-in roles per tag.
static BUILTIN_ROLES: &[(&str, &[&str])] = &[
    // Structure
    ("CompilationUnit", &["File", "Module"]),
    ("SourceFile", &["File", "Module"]),
    ("Block", &["Block"]),
    ("NamespaceDeclaration", &["Block", "Scope"]),
    ("UsingDirective", &["Import", "Statement"]),
    ("ClassDeclaration", &["Type", "Declaration"]),
    ("StructDeclaration", &["Type", "Declaration"]),
    ("InterfaceDeclaration", &["Type", "Declaration"]),
    ("EnumDeclaration", &["Type", "Declaration"]),
    ("FieldDeclaration", &["Type", "Declaration", "Variable"]),
    ("MethodDeclaration", &["Function", "Declaration"]),
    ("FunctionItem", &["Function", "Declaration"]),
    ("ParameterList", &["Function", "Declaration", "Argument", "List"]),
    ("Parameter", &["Function", "Declaration", "Argument"]),
    ("LocalDeclarationStatement", &["Declaration", "Statement"]),
    ("VariableDeclaration", &["Declaration", "Variable"]),
    ("VariableDeclarator", &["Declaration", "Variable"]),
    ("EqualsValueClause", &["Assignment", "Right"]),
    // Statements
    ("ExpressionStatement", &["Expression", "Statement"]),
    ("ReturnStatement", &["Return", "Statement"]),
    ("IfStatement", &["If", "Statement"]),
    ("WhileStatement", &["While", "Statement"]),
    ("ForStatement", &["For", "Statement"]),
    ("ForeachStatement", &["For", "Iterator", "Statement"]),
    ("SwitchStatement", &["Switch", "Statement"]),
    ("BreakStatement", &["Break", "Statement"]),
    ("ContinueStatement", &["Continue", "Statement"]),
    // Expressions
    ("InvocationExpression", &["Function", "Call"]),
    ("CallExpression", &["Function", "Call"]),
    ("ArgumentList", &["Function", "Call", "Argument", "List"]),
    ("Argument", &["Function", "Call", "Argument"]),
    ("MemberAccessExpression", &["Qualified"]),
    ("ObjectCreationExpression", &["Type", "Instance"]),
    ("ParenthesizedExpression", &["Expression"]),
    ("LambdaExpression", &["Function", "Declaration", "Anonymous", "Expression"]),
    ("BinaryExpression_AddExpression", &["Binary", "Expression", "Arithmetic", "Add"]),
    ("BinaryExpression_SubtractExpression", &["Binary", "Expression", "Arithmetic", "Subtract"]),
    ("BinaryExpression_MultiplyExpression", &["Binary", "Expression", "Arithmetic", "Multiply"]),
    ("BinaryExpression_DivideExpression", &["Binary", "Expression", "Arithmetic", "Divide"]),
    ("BinaryExpression_ModuloExpression", &["Binary", "Expression", "Arithmetic", "Modulo"]),
    ("BinaryExpression_LeftShiftExpression", &["Binary", "Expression", "Bitwise", "LeftShift"]),
    ("BinaryExpression_RightShiftExpression", &["Binary", "Expression", "Bitwise", "RightShift"]),
    ("BinaryExpression_BitwiseAndExpression", &["Binary", "Expression", "Bitwise", "And"]),
    ("BinaryExpression_BitwiseOrExpression", &["Binary", "Expression", "Bitwise", "Or"]),
    ("BinaryExpression_ExclusiveOrExpression", &["Binary", "Expression", "Bitwise", "Xor"]),
    ("BinaryExpression_LogicalAndExpression", &["Binary", "Expression", "Relational", "And"]),
    ("BinaryExpression_LogicalOrExpression", &["Binary", "Expression", "Relational", "Or"]),
    ("BinaryExpression_EqualsExpression", &["Binary", "Expression", "Relational", "Equal"]),
    ("BinaryExpression_NotEqualsExpression", &["Binary", "Expression", "Relational", "Not", "Equal"]),
    ("BinaryExpression_LessThanExpression", &["Binary", "Expression", "Relational", "LessThan"]),
    ("BinaryExpression_LessThanOrEqualExpression", &["Binary", "Expression", "Relational", "LessThanOrEqual"]),
    ("BinaryExpression_GreaterThanExpression", &["Binary", "Expression", "Relational", "GreaterThan"]),
    ("BinaryExpression_GreaterThanOrEqualExpression", &["Binary", "Expression", "Relational", "GreaterThanOrEqual"]),
    ("SimpleAssignmentExpression", &["Assignment", "Expression"]),
    ("PrefixUnaryExpression_LogicalNotExpression", &["Unary", "Expression", "Relational", "Not"]),
    ("PrefixUnaryExpression_BitwiseNotExpression", &["Unary", "Expression", "Bitwise", "Not"]),
    ("PrefixUnaryExpression_PreIncrementExpression", &["Unary", "Expression", "Arithmetic", "Increment"]),
    ("PrefixUnaryExpression_PreDecrementExpression", &["Unary", "Expression", "Arithmetic", "Decrement"]),
    ("PostfixUnaryExpression_PostIncrementExpression", &["Unary", "Expression", "Arithmetic", "Increment"]),
    ("PostfixUnaryExpression_PostDecrementExpression", &["Unary", "Expression", "Arithmetic", "Decrement"]),
    // Literals
    ("IntegerLiteral", &["Literal", "Number"]),
    ("RealLiteral", &["Literal", "Number"]),
    ("CharacterLiteral", &["Literal", "Character"]),
    ("StringLiteral", &["Literal", "String"]),
    ("BooleanLiteral", &["Literal", "Boolean"]),
    ("NullLiteral", &["Literal", "Null"]),
    ("Identifier", &["Identifier"]),
    // Operator tokens
    ("PlusToken", &["Operator", "Arithmetic", "Add"]),
    ("MinusToken", &["Operator", "Arithmetic", "Subtract"]),
    ("AsteriskToken", &["Operator", "Arithmetic", "Multiply"]),
    ("SlashToken", &["Operator", "Arithmetic", "Divide"]),
    ("PercentToken", &["Operator", "Arithmetic", "Modulo"]),
    ("PlusPlusToken", &["Operator", "Unary", "Increment"]),
    ("MinusMinusToken", &["Operator", "Unary", "Decrement"]),
    ("AmpersandAmpersandToken", &["Operator", "Relational", "And"]),
    ("BarBarToken", &["Operator", "Relational", "Or"]),
    ("ExclamationToken", &["Operator", "Not"]),
    ("AmpersandToken", &["Operator", "Bitwise", "And"]),
    ("BarToken", &["Operator", "Bitwise", "Or"]),
    ("CaretToken", &["Operator", "Bitwise", "Xor"]),
    ("TildeToken", &["Operator", "Unary", "Bitwise", "Not"]),
    ("LessThanLessThanToken", &["Operator", "Bitwise", "LeftShift"]),
    ("GreaterThanGreaterThanToken", &["Operator", "Bitwise", "RightShift"]),
    ("EqualsToken", &["Operator", "Assignment"]),
    ("EqualsEqualsToken", &["Operator", "Relational", "Equal"]),
    ("ExclamationEqualsToken", &["Operator", "Relational", "Not", "Equal"]),
    ("LessThanToken", &["Operator", "Relational", "LessThan"]),
    ("LessThanEqualsToken", &["Operator", "Relational", "LessThanOrEqual"]),
    ("GreaterThanToken", &["Operator", "Relational", "GreaterThan"]),
    ("GreaterThanEqualsToken", &["Operator", "Relational", "GreaterThanOrEqual"]),
    ("PlusEqualsToken", &["Operator", "Arithmetic", "Add", "Assignment"]),
    ("MinusEqualsToken", &["Operator", "Arithmetic", "Subtract", "Assignment"]),
    // Keywords
    ("UsingKeyword", &["Keyword", "Import"]),
    ("NamespaceKeyword", &["Keyword", "Block"]),
    ("ClassKeyword", &["Keyword", "Type", "Declaration"]),
    ("StructKeyword", &["Keyword", "Type", "Declaration"]),
    ("IfKeyword", &["Keyword", "If"]),
    ("ElseKeyword", &["Keyword", "Else"]),
    ("WhileKeyword", &["Keyword", "While"]),
    ("ForKeyword", &["Keyword", "For"]),
    ("ForeachKeyword", &["Keyword", "For", "Iterator"]),
    ("SwitchKeyword", &["Keyword", "Switch"]),
    ("CaseKeyword", &["Keyword", "Switch", "Case"]),
    ("DefaultKeyword", &["Keyword", "Default"]),
    ("BreakKeyword", &["Keyword", "Break"]),
    ("ContinueKeyword", &["Keyword", "Continue"]),
    ("GotoKeyword", &["Keyword", "Goto"]),
    ("ReturnKeyword", &["Keyword", "Return"]),
    ("YieldKeyword", &["Keyword", "Return"]),
    ("NewKeyword", &["Keyword", "Instance"]),
    ("NullKeyword", &["Keyword", "Null", "Literal"]),
    ("TrueKeyword", &["Keyword", "Boolean", "Literal"]),
    ("FalseKeyword", &["Keyword", "Boolean", "Literal"]),
    ("PublicKeyword", &["Keyword", "Visibility", "World"]),
    ("ProtectedKeyword", &["Keyword", "Visibility", "Subtype"]),
    ("PrivateKeyword", &["Keyword", "Visibility", "Instance"]),
    ("BoolKeyword", &["Keyword", "Boolean", "Declaration"]),
    ("IntKeyword", &["Keyword", "Number", "Declaration"]),
    ("LongKeyword", &["Keyword", "Number", "Declaration"]),
    ("DoubleKeyword", &["Keyword", "Number", "Declaration"]),
    ("CharKeyword", &["Keyword", "Character", "Declaration"]),
    ("StringKeyword", &["Keyword", "String", "Declaration"]),
    ("FnKeyword", &["Keyword", "Function", "Declaration"]),
    ("LetKeyword", &["Keyword", "Declaration", "Variable"]),
    ("LoopKeyword", &["Keyword", "While"]),
    // Trivia
    ("SingleLineCommentTrivia", &["Comment"]),
    ("MultiLineCommentTrivia", &["Comment"]),
    ("SingleLineDocumentationCommentTrivia", &["Comment", "Documentation"]),
    ("MultiLineDocumentationCommentTrivia", &["Comment", "Documentation"]),
];

/// Roles for each type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    roles: HashMap<String, Vec<String>>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleTable {
    /// The built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let roles = BUILTIN_ROLES
            .iter()
            .map(|(tag, roles)| {
                (
                    (*tag).to_string(),
                    roles.iter().map(|r| (*r).to_string()).collect(),
                )
            })
            .collect();
        Self { roles }
    }

    /// The built-in table with `overrides` applied on top.
    ///
    /// An override replaces the built-in entry for its tag; an empty list
    /// removes the tag.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::builtin();
        for (tag, roles) in overrides {
            if roles.is_empty() {
                table.roles.remove(tag);
            } else {
                table.roles.insert(tag.clone(), roles.clone());
            }
        }
        tracing::debug!(
            tags = table.len(),
            overrides = overrides.len(),
            "Built role table"
        );
        table
    }

    /// Roles for `tag`, if it has any.
    #[must_use]
    pub fn roles(&self, tag: &str) -> Option<&[String]> {
        self.roles.get(tag).map(Vec::as_slice)
    }

    /// Number of annotated tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns `true` if no tag is annotated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file("CompilationUnit", &["File", "Module"])]
    #[case::refined("BinaryExpression_AddExpression", &["Binary", "Expression", "Arithmetic", "Add"])]
    #[case::operator("PlusToken", &["Operator", "Arithmetic", "Add"])]
    #[case::keyword("IfKeyword", &["Keyword", "If"])]
    #[case::statement("IfStatement", &["If", "Statement"])]
    fn builtin_roles(#[case] tag: &str, #[case] expected: &[&str]) {
        let table = RoleTable::builtin();
        assert_eq!(table.roles(tag).unwrap(), expected);
    }

    #[test]
    fn unknown_tags_have_no_roles() {
        assert!(RoleTable::builtin().roles("SemicolonToken").is_none());
    }

    #[test]
    fn builtin_tags_are_unique() {
        let mut tags: Vec<_> = BUILTIN_ROLES.iter().map(|(tag, _)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), BUILTIN_ROLES.len());
    }

    #[test]
    fn overrides_replace_add_and_remove() {
        let overrides = BTreeMap::from([
            ("PlusToken".to_string(), vec!["Plus".to_string()]),
            ("SemicolonToken".to_string(), vec!["Separator".to_string()]),
            ("IfKeyword".to_string(), vec![]),
        ]);
        let table = RoleTable::with_overrides(&overrides);

        assert_eq!(table.roles("PlusToken").unwrap(), ["Plus"]);
        assert_eq!(table.roles("SemicolonToken").unwrap(), ["Separator"]);
        assert!(table.roles("IfKeyword").is_none());
        assert_eq!(table.len(), RoleTable::builtin().len());
    }
}
