// Position analysis on the CST
//
// Finds the symbol under a cursor, the kind of completion a cursor position
// calls for, and the parent type of a selection set. All offsets are byte
// offsets into the text the tree was parsed from.

use apollo_compiler::ast::DirectiveLocation;
use apollo_compiler::Schema;
use apollo_parser::cst::{self, CstNode};
use apollo_parser::TokenKind;
use graphql_syntax::repair::LexToken;
use graphql_types::OffsetRange;

use crate::helpers::{
    cst_operation_type, field_definition, is_inside_delimiters, is_within_range, name_text,
    named_type_text, node_offset_range, root_type_name,
};

/// A GraphQL symbol identified at a specific position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A type name reference (type conditions, variable types, definitions)
    TypeName { name: String },
    /// A field selection in an operation or fragment
    FieldName { name: String },
    /// A fragment spread (`...Name`) or fragment definition name
    FragmentSpread { name: String },
    /// An operation name
    OperationName { name: String },
    /// A variable reference (`$name`)
    VariableReference { name: String },
    /// An argument name on a field or directive
    ArgumentName {
        name: String,
        field: Option<String>,
        directive: Option<String>,
    },
    /// A directive reference (`@name`)
    DirectiveName { name: String },
}

/// A symbol and the byte range of its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAt {
    pub symbol: Symbol,
    pub range: OffsetRange,
}

/// Context for completion at a specific position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// Completing field names in a selection set
    Field,
    /// Completing fragment names after `...`
    FragmentSpread,
    /// Completing argument names of a field or directive
    Argument {
        field_name: Option<String>,
        directive_name: Option<String>,
        /// Arguments already written
        existing: Vec<String>,
    },
    /// Completing the value of an argument, after `name:`
    ArgumentValue {
        field_name: Option<String>,
        directive_name: Option<String>,
        argument: String,
    },
    /// Completing directive names after `@`
    Directive { location: Option<DirectiveLocation> },
    /// Completing type names (variable types, type conditions)
    TypeName {
        /// Whether only input types are valid (variable definitions)
        input_only: bool,
    },
    /// Between definitions: operation and fragment keywords
    Definition,
}

/// Find the symbol at a specific byte offset in the document
pub fn find_symbol_at_offset(tree: &apollo_parser::SyntaxTree, byte_offset: usize) -> Option<SymbolAt> {
    let doc = tree.document();

    for definition in doc.definitions() {
        if !is_within_range(&definition, byte_offset) {
            continue;
        }
        if let Some(symbol) = check_definition(&definition, byte_offset) {
            return Some(symbol);
        }
    }

    None
}

fn symbol_at(
    name: Option<cst::Name>,
    byte_offset: usize,
    make: impl FnOnce(String) -> Symbol,
) -> Option<SymbolAt> {
    let name = name?;
    is_within_range(&name, byte_offset).then(|| SymbolAt {
        range: node_offset_range(&name),
        symbol: make(name_text(&name)),
    })
}

fn type_name_symbol(name: String) -> Symbol {
    Symbol::TypeName { name }
}

fn check_definition(definition: &cst::Definition, byte_offset: usize) -> Option<SymbolAt> {
    match definition {
        cst::Definition::OperationDefinition(op) => check_operation(op, byte_offset),
        cst::Definition::FragmentDefinition(frag) => check_fragment_definition(frag, byte_offset),
        cst::Definition::ObjectTypeDefinition(obj) => symbol_at(obj.name(), byte_offset, type_name_symbol)
            .or_else(|| check_implements_interfaces(obj.implements_interfaces(), byte_offset))
            .or_else(|| check_fields_definition(obj.fields_definition(), byte_offset)),
        cst::Definition::InterfaceTypeDefinition(iface) => {
            symbol_at(iface.name(), byte_offset, type_name_symbol)
                .or_else(|| check_implements_interfaces(iface.implements_interfaces(), byte_offset))
                .or_else(|| check_fields_definition(iface.fields_definition(), byte_offset))
        }
        cst::Definition::UnionTypeDefinition(union) => {
            symbol_at(union.name(), byte_offset, type_name_symbol).or_else(|| {
                union.union_member_types()?.named_types().find_map(|member| {
                    symbol_at(member.name(), byte_offset, type_name_symbol)
                })
            })
        }
        cst::Definition::EnumTypeDefinition(enum_def) => {
            symbol_at(enum_def.name(), byte_offset, type_name_symbol)
        }
        cst::Definition::ScalarTypeDefinition(scalar) => {
            symbol_at(scalar.name(), byte_offset, type_name_symbol)
        }
        cst::Definition::InputObjectTypeDefinition(input) => {
            symbol_at(input.name(), byte_offset, type_name_symbol).or_else(|| {
                input
                    .input_fields_definition()?
                    .input_value_definitions()
                    .find_map(|field| check_type_reference(&field.ty()?, byte_offset))
            })
        }
        _ => None,
    }
}

fn check_fields_definition(
    fields: Option<cst::FieldsDefinition>,
    byte_offset: usize,
) -> Option<SymbolAt> {
    for field in fields?.field_definitions() {
        if let Some(ty) = field.ty() {
            if let Some(symbol) = check_type_reference(&ty, byte_offset) {
                return Some(symbol);
            }
        }
        if let Some(args) = field.arguments_definition() {
            for arg in args.input_value_definitions() {
                if let Some(ty) = arg.ty() {
                    if let Some(symbol) = check_type_reference(&ty, byte_offset) {
                        return Some(symbol);
                    }
                }
            }
        }
    }
    None
}

fn check_type_reference(ty: &cst::Type, byte_offset: usize) -> Option<SymbolAt> {
    match ty {
        cst::Type::NamedType(named) => symbol_at(named.name(), byte_offset, type_name_symbol),
        cst::Type::ListType(list) => check_type_reference(&list.ty()?, byte_offset),
        cst::Type::NonNullType(non_null) => {
            if let Some(named) = non_null.named_type() {
                return symbol_at(named.name(), byte_offset, type_name_symbol);
            }
            check_type_reference(&non_null.list_type()?.ty()?, byte_offset)
        }
    }
}

fn check_implements_interfaces(
    implements: Option<cst::ImplementsInterfaces>,
    byte_offset: usize,
) -> Option<SymbolAt> {
    implements?
        .named_types()
        .find_map(|named| symbol_at(named.name(), byte_offset, type_name_symbol))
}

fn check_operation(op: &cst::OperationDefinition, byte_offset: usize) -> Option<SymbolAt> {
    if let Some(symbol) = symbol_at(op.name(), byte_offset, |name| Symbol::OperationName { name }) {
        return Some(symbol);
    }

    if let Some(var_defs) = op.variable_definitions() {
        for var_def in var_defs.variable_definitions() {
            let variable_name = var_def.variable().and_then(|v| v.name());
            if let Some(symbol) =
                symbol_at(variable_name, byte_offset, |name| Symbol::VariableReference { name })
            {
                return Some(symbol);
            }
            if let Some(ty) = var_def.ty() {
                if let Some(symbol) = check_type_reference(&ty, byte_offset) {
                    return Some(symbol);
                }
            }
        }
    }

    if let Some(symbol) = check_directives(op.directives(), byte_offset) {
        return Some(symbol);
    }

    check_selection_set(&op.selection_set()?, byte_offset)
}

fn check_fragment_definition(frag: &cst::FragmentDefinition, byte_offset: usize) -> Option<SymbolAt> {
    let fragment_name = frag.fragment_name().and_then(|n| n.name());
    if let Some(symbol) = symbol_at(fragment_name, byte_offset, |name| Symbol::FragmentSpread { name })
    {
        return Some(symbol);
    }

    let type_condition = frag.type_condition().and_then(|tc| tc.named_type());
    if let Some(symbol) = symbol_at(
        type_condition.and_then(|named| named.name()),
        byte_offset,
        type_name_symbol,
    ) {
        return Some(symbol);
    }

    if let Some(symbol) = check_directives(frag.directives(), byte_offset) {
        return Some(symbol);
    }

    check_selection_set(&frag.selection_set()?, byte_offset)
}

fn check_directives(directives: Option<cst::Directives>, byte_offset: usize) -> Option<SymbolAt> {
    for directive in directives?.directives() {
        if let Some(symbol) =
            symbol_at(directive.name(), byte_offset, |name| Symbol::DirectiveName { name })
        {
            return Some(symbol);
        }
        if let Some(arguments) = directive.arguments() {
            let directive_name = directive.name().map(|n| name_text(&n));
            if let Some(symbol) = check_arguments(&arguments, byte_offset, None, directive_name) {
                return Some(symbol);
            }
        }
    }
    None
}

fn check_arguments(
    arguments: &cst::Arguments,
    byte_offset: usize,
    field: Option<String>,
    directive: Option<String>,
) -> Option<SymbolAt> {
    for arg in arguments.arguments() {
        if let Some(symbol) = symbol_at(arg.name(), byte_offset, |name| Symbol::ArgumentName {
            name,
            field: field.clone(),
            directive: directive.clone(),
        }) {
            return Some(symbol);
        }
        if let Some(value) = arg.value() {
            if let Some(symbol) = check_value(&value, byte_offset) {
                return Some(symbol);
            }
        }
    }
    None
}

fn check_value(value: &cst::Value, byte_offset: usize) -> Option<SymbolAt> {
    match value {
        cst::Value::Variable(var) => {
            if !is_within_range(var, byte_offset) {
                return None;
            }
            // The range covers the `$` too
            let name = var.name()?;
            Some(SymbolAt {
                range: node_offset_range(var),
                symbol: Symbol::VariableReference {
                    name: name_text(&name),
                },
            })
        }
        cst::Value::ListValue(list) => list.values().find_map(|val| check_value(&val, byte_offset)),
        cst::Value::ObjectValue(obj) => obj
            .object_fields()
            .find_map(|field| check_value(&field.value()?, byte_offset)),
        // Other value types don't contain symbols we care about
        _ => None,
    }
}

fn check_selection_set(selection_set: &cst::SelectionSet, byte_offset: usize) -> Option<SymbolAt> {
    for selection in selection_set.selections() {
        if !is_within_range(&selection, byte_offset) {
            continue;
        }
        match selection {
            cst::Selection::Field(field) => {
                if let Some(symbol) =
                    symbol_at(field.name(), byte_offset, |name| Symbol::FieldName { name })
                {
                    return Some(symbol);
                }

                if let Some(arguments) = field.arguments() {
                    let field_name = field.name().map(|n| name_text(&n));
                    if let Some(symbol) = check_arguments(&arguments, byte_offset, field_name, None)
                    {
                        return Some(symbol);
                    }
                }

                if let Some(symbol) = check_directives(field.directives(), byte_offset) {
                    return Some(symbol);
                }

                if let Some(nested) = field.selection_set() {
                    if let Some(symbol) = check_selection_set(&nested, byte_offset) {
                        return Some(symbol);
                    }
                }
            }
            cst::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name().and_then(|n| n.name());
                if let Some(symbol) =
                    symbol_at(name, byte_offset, |name| Symbol::FragmentSpread { name })
                {
                    return Some(symbol);
                }
                if let Some(symbol) = check_directives(spread.directives(), byte_offset) {
                    return Some(symbol);
                }
            }
            cst::Selection::InlineFragment(inline_frag) => {
                let type_condition = inline_frag
                    .type_condition()
                    .and_then(|tc| tc.named_type())
                    .and_then(|named| named.name());
                if let Some(symbol) = symbol_at(type_condition, byte_offset, type_name_symbol) {
                    return Some(symbol);
                }
                if let Some(symbol) = check_directives(inline_frag.directives(), byte_offset) {
                    return Some(symbol);
                }
                if let Some(nested) = inline_frag.selection_set() {
                    if let Some(symbol) = check_selection_set(&nested, byte_offset) {
                        return Some(symbol);
                    }
                }
            }
        }
    }

    None
}

/// Check if an offset touches a node: inside it or at either edge.
fn touches<T: CstNode>(node: &T, byte_offset: usize) -> bool {
    let range = node_offset_range(node);
    byte_offset >= range.start && byte_offset <= range.end
}

/// Walks the CST from the root to the cursor, following field types and type
/// conditions, and returns the type of the innermost selection set that
/// contains the cursor.
pub fn parent_type_at_offset(
    tree: &apollo_parser::SyntaxTree,
    schema: &Schema,
    byte_offset: usize,
) -> Option<String> {
    for definition in tree.document().definitions() {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                let Some(selection_set) = op.selection_set() else {
                    continue;
                };
                if !is_inside_delimiters(&selection_set, byte_offset) {
                    continue;
                }
                let root = root_type_name(schema, cst_operation_type(&op))?;
                return walk_selection_set(&selection_set, byte_offset, schema, root.to_string());
            }
            cst::Definition::FragmentDefinition(frag) => {
                let Some(selection_set) = frag.selection_set() else {
                    continue;
                };
                if !is_inside_delimiters(&selection_set, byte_offset) {
                    continue;
                }
                let root = frag
                    .type_condition()
                    .and_then(|tc| tc.named_type())
                    .and_then(|named| named_type_text(&named))?;
                return walk_selection_set(&selection_set, byte_offset, schema, root);
            }
            _ => {}
        }
    }
    None
}

fn walk_selection_set(
    selection_set: &cst::SelectionSet,
    byte_offset: usize,
    schema: &Schema,
    current: String,
) -> Option<String> {
    for selection in selection_set.selections() {
        match selection {
            cst::Selection::Field(field) => {
                let Some(nested) = field.selection_set() else {
                    continue;
                };
                if !is_inside_delimiters(&nested, byte_offset) {
                    continue;
                }
                let field_name = name_text(&field.name()?);
                let field_def = field_definition(schema, &current, &field_name)?;
                let field_type = field_def.ty.inner_named_type().to_string();
                tracing::trace!(field = %field_name, ty = %field_type, "Descending into field");
                return walk_selection_set(&nested, byte_offset, schema, field_type);
            }
            cst::Selection::InlineFragment(inline_frag) => {
                let Some(nested) = inline_frag.selection_set() else {
                    continue;
                };
                if !is_inside_delimiters(&nested, byte_offset) {
                    continue;
                }
                let ty = inline_frag
                    .type_condition()
                    .and_then(|tc| tc.named_type())
                    .and_then(|named| named_type_text(&named))
                    .unwrap_or(current);
                return walk_selection_set(&nested, byte_offset, schema, ty);
            }
            cst::Selection::FragmentSpread(_) => {}
        }
    }
    Some(current)
}

/// Check if the byte offset is within a selection set (for field completions)
pub fn is_in_selection_set(tree: &apollo_parser::SyntaxTree, byte_offset: usize) -> bool {
    tree.document().definitions().any(|definition| {
        let selection_set = match definition {
            cst::Definition::OperationDefinition(op) => op.selection_set(),
            cst::Definition::FragmentDefinition(frag) => frag.selection_set(),
            _ => None,
        };
        selection_set.is_some_and(|set| is_inside_delimiters(&set, byte_offset))
    })
}

/// Find the completion context at a specific byte offset.
///
/// `source` is the text the tree was parsed from and `tokens` the
/// significant tokens before the cursor, excluding the partial name being
/// typed.
pub fn find_completion_context(
    source: &str,
    tree: &apollo_parser::SyntaxTree,
    byte_offset: usize,
    tokens: &[LexToken],
) -> Option<CompletionContext> {
    let back = |n: usize| tokens.len().checked_sub(n).map(|i| &tokens[i]);
    let last = back(1);

    match last.map(|token| token.kind) {
        Some(TokenKind::At) => {
            let location = find_directive_location(source, tree, byte_offset, tokens);
            return Some(CompletionContext::Directive { location });
        }
        Some(TokenKind::Spread) => return Some(CompletionContext::FragmentSpread),
        _ => {}
    }

    if last.is_some_and(|token| token.is_name(source, "on")) {
        let after_spread = back(2).is_some_and(|token| token.kind == TokenKind::Spread);
        let in_fragment_header = back(3).is_some_and(|token| token.is_name(source, "fragment"));
        if after_spread || in_fragment_header {
            return Some(CompletionContext::TypeName { input_only: false });
        }
    }

    if is_in_variable_type_position(source, tree, byte_offset) {
        return Some(CompletionContext::TypeName { input_only: true });
    }

    if let Some(arguments) = find_argument_context(tree, byte_offset) {
        if last.is_some_and(|token| token.kind == TokenKind::Colon) {
            let argument = back(2)
                .filter(|token| token.kind == TokenKind::Name)
                .map(|token| token.text(source).to_string())?;
            return Some(CompletionContext::ArgumentValue {
                field_name: arguments.field_name,
                directive_name: arguments.directive_name,
                argument,
            });
        }
        return Some(CompletionContext::Argument {
            field_name: arguments.field_name,
            directive_name: arguments.directive_name,
            existing: arguments.existing,
        });
    }

    if is_in_selection_set(tree, byte_offset) {
        return Some(CompletionContext::Field);
    }

    let depth = tokens.iter().fold(0i32, |depth, token| match token.kind {
        TokenKind::LCurly | TokenKind::LParen => depth + 1,
        TokenKind::RCurly | TokenKind::RParen => depth - 1,
        _ => depth,
    });
    if depth <= 0 && last.is_none_or(|token| token.kind == TokenKind::RCurly) {
        return Some(CompletionContext::Definition);
    }

    None
}

/// Find the directive location for a given position
fn find_directive_location(
    source: &str,
    tree: &apollo_parser::SyntaxTree,
    byte_offset: usize,
    tokens: &[LexToken],
) -> Option<DirectiveLocation> {
    for definition in tree.document().definitions() {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                if !touches(&op, byte_offset) {
                    continue;
                }
                if op
                    .variable_definitions()
                    .is_some_and(|var_defs| is_inside_delimiters(&var_defs, byte_offset))
                {
                    return Some(DirectiveLocation::VariableDefinition);
                }
                if op
                    .selection_set()
                    .is_some_and(|set| is_inside_delimiters(&set, byte_offset))
                {
                    return Some(selection_directive_location(source, tokens));
                }
                return Some(match cst_operation_type(&op) {
                    apollo_compiler::ast::OperationType::Query => DirectiveLocation::Query,
                    apollo_compiler::ast::OperationType::Mutation => DirectiveLocation::Mutation,
                    apollo_compiler::ast::OperationType::Subscription => {
                        DirectiveLocation::Subscription
                    }
                });
            }
            cst::Definition::FragmentDefinition(frag) => {
                if !touches(&frag, byte_offset) {
                    continue;
                }
                if frag
                    .selection_set()
                    .is_some_and(|set| is_inside_delimiters(&set, byte_offset))
                {
                    return Some(selection_directive_location(source, tokens));
                }
                return Some(DirectiveLocation::FragmentDefinition);
            }
            _ => {}
        }
    }

    None
}

/// Location of a directive inside a selection set, from the tokens before `@`.
fn selection_directive_location(source: &str, tokens: &[LexToken]) -> DirectiveLocation {
    let before_at = &tokens[..tokens.len().saturating_sub(1)];
    match before_at {
        [.., spread, on, _] if spread.kind == TokenKind::Spread && on.is_name(source, "on") => {
            DirectiveLocation::InlineFragment
        }
        [.., spread] if spread.kind == TokenKind::Spread => DirectiveLocation::InlineFragment,
        [.., spread, name] if spread.kind == TokenKind::Spread && name.kind == TokenKind::Name => {
            DirectiveLocation::FragmentSpread
        }
        _ => DirectiveLocation::Field,
    }
}

/// Check if the cursor is in a variable type position (after `:` in a
/// variable definition, before any default value)
fn is_in_variable_type_position(
    source: &str,
    tree: &apollo_parser::SyntaxTree,
    byte_offset: usize,
) -> bool {
    for definition in tree.document().definitions() {
        let cst::Definition::OperationDefinition(op) = definition else {
            continue;
        };
        let Some(var_defs) = op.variable_definitions() else {
            continue;
        };
        if !is_inside_delimiters(&var_defs, byte_offset) {
            continue;
        }
        let var_start = node_offset_range(&var_defs).start;
        let prefix = &source[var_start..byte_offset.min(source.len())];
        if let Some(last_dollar) = prefix.rfind('$') {
            let after_dollar = &prefix[last_dollar..];
            return after_dollar.contains(':') && !after_dollar.contains('=');
        }
    }

    false
}

/// The field or directive whose argument list contains the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArgumentContext {
    field_name: Option<String>,
    directive_name: Option<String>,
    existing: Vec<String>,
}

impl ArgumentContext {
    fn new(arguments: &cst::Arguments, field_name: Option<String>, directive_name: Option<String>) -> Self {
        Self {
            field_name,
            directive_name,
            existing: arguments
                .arguments()
                .filter_map(|arg| arg.name())
                .map(|name| name_text(&name))
                .collect(),
        }
    }
}

/// Find argument context if cursor is in an argument position
fn find_argument_context(
    tree: &apollo_parser::SyntaxTree,
    byte_offset: usize,
) -> Option<ArgumentContext> {
    tree.document().definitions().find_map(|definition| {
        let selection_set = match definition {
            cst::Definition::OperationDefinition(op) => op.selection_set(),
            cst::Definition::FragmentDefinition(frag) => frag.selection_set(),
            _ => None,
        }?;
        find_argument_in_selection_set(&selection_set, byte_offset)
    })
}

fn find_argument_in_directives(
    directives: Option<cst::Directives>,
    byte_offset: usize,
) -> Option<ArgumentContext> {
    for directive in directives?.directives() {
        if let Some(arguments) = directive.arguments() {
            if is_inside_delimiters(&arguments, byte_offset) {
                let directive_name = directive.name().map(|n| name_text(&n));
                return Some(ArgumentContext::new(&arguments, None, directive_name));
            }
        }
    }
    None
}

fn find_argument_in_selection_set(
    selection_set: &cst::SelectionSet,
    byte_offset: usize,
) -> Option<ArgumentContext> {
    for selection in selection_set.selections() {
        match selection {
            cst::Selection::Field(field) => {
                // Check if we're in this field's arguments
                if let Some(arguments) = field.arguments() {
                    if is_inside_delimiters(&arguments, byte_offset) {
                        let field_name = field.name().map(|n| name_text(&n));
                        return Some(ArgumentContext::new(&arguments, field_name, None));
                    }
                }

                if let Some(ctx) = find_argument_in_directives(field.directives(), byte_offset) {
                    return Some(ctx);
                }

                if let Some(nested) = field.selection_set() {
                    if let Some(ctx) = find_argument_in_selection_set(&nested, byte_offset) {
                        return Some(ctx);
                    }
                }
            }
            cst::Selection::FragmentSpread(spread) => {
                if let Some(ctx) = find_argument_in_directives(spread.directives(), byte_offset) {
                    return Some(ctx);
                }
            }
            cst::Selection::InlineFragment(inline_frag) => {
                if let Some(ctx) = find_argument_in_directives(inline_frag.directives(), byte_offset)
                {
                    return Some(ctx);
                }
                if let Some(nested) = inline_frag.selection_set() {
                    if let Some(ctx) = find_argument_in_selection_set(&nested, byte_offset) {
                        return Some(ctx);
                    }
                }
            }
        }
    }

    None
}

/// A fragment definition found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentInfo {
    pub name: String,
    pub type_condition: Option<String>,
    pub range: OffsetRange,
}

/// Every named fragment definition in the document, in source order.
pub fn fragment_definitions(tree: &apollo_parser::SyntaxTree) -> Vec<FragmentInfo> {
    tree.document()
        .definitions()
        .filter_map(|definition| {
            let cst::Definition::FragmentDefinition(frag) = definition else {
                return None;
            };
            let name = frag.fragment_name()?.name()?;
            Some(FragmentInfo {
                name: name_text(&name),
                type_condition: frag
                    .type_condition()
                    .and_then(|tc| tc.named_type())
                    .and_then(|named| named_type_text(&named)),
                range: node_offset_range(&frag),
            })
        })
        .collect()
}

/// Variables `(name, type)` defined by the operation containing the cursor.
pub fn variables_in_scope(tree: &apollo_parser::SyntaxTree, byte_offset: usize) -> Vec<(String, String)> {
    let Some(op) = tree.document().definitions().find_map(|definition| match definition {
        cst::Definition::OperationDefinition(op) if touches(&op, byte_offset) => Some(op),
        _ => None,
    }) else {
        return Vec::new();
    };

    let Some(var_defs) = op.variable_definitions() else {
        return Vec::new();
    };

    var_defs
        .variable_definitions()
        .filter_map(|var_def| {
            let name = var_def.variable()?.name()?;
            let ty = var_def
                .ty()
                .map(|ty| ty.syntax().text().to_string().trim().to_string())
                .unwrap_or_default();
            Some((name_text(&name), ty))
        })
        .collect()
}
