//! Document symbols feature implementation.
//!
//! A flat outline of a document: executable definitions with their
//! top-level selections, and type-system definitions with their fields and
//! values. Nested entries name their owning definition in `container_name`.

use apollo_parser::cst::{self, CstNode};
use graphql_syntax::LineIndex;
use graphql_types::Document;

use crate::helpers::{cst_operation_type, name_text, node_range, operation_keyword};
use crate::types::{Location, SymbolInformation, SymbolKind};

/// Get the outline of a document.
///
/// Works on documents with syntax errors; whatever the parser recovered is
/// listed.
pub(crate) fn document_symbols(document: &Document) -> Vec<SymbolInformation> {
    let text = document.text();
    let line_index = LineIndex::new(text);
    let parse = graphql_syntax::parse(text);

    let mut outline = Outline {
        document,
        line_index: &line_index,
        symbols: Vec::new(),
    };

    for definition in parse.tree.document().definitions() {
        outline.add_definition(&definition);
    }

    outline.symbols
}

struct Outline<'a> {
    document: &'a Document,
    line_index: &'a LineIndex,
    symbols: Vec<SymbolInformation>,
}

impl Outline<'_> {
    fn location<T: CstNode>(&self, node: &T) -> Location {
        Location::new(self.document.uri.clone(), node_range(self.line_index, node))
    }

    fn push<T: CstNode>(&mut self, name: String, kind: SymbolKind, node: &T, container: Option<&str>) {
        let symbol = SymbolInformation::new(name, kind, self.location(node));
        self.symbols.push(match container {
            Some(container) => symbol.with_container(container),
            None => symbol,
        });
    }

    fn add_definition(&mut self, definition: &cst::Definition) {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                let operation_type = cst_operation_type(op);
                let name = op.name().map_or_else(
                    || format!("<anonymous {}>", operation_keyword(operation_type)),
                    |name| name_text(&name),
                );
                let kind = match operation_type {
                    apollo_compiler::ast::OperationType::Query => SymbolKind::Query,
                    apollo_compiler::ast::OperationType::Mutation => SymbolKind::Mutation,
                    apollo_compiler::ast::OperationType::Subscription => SymbolKind::Subscription,
                };
                self.push(name.clone(), kind, op, None);
                self.add_selections(op.selection_set(), &name);
            }
            cst::Definition::FragmentDefinition(frag) => {
                let Some(name) = frag.fragment_name().and_then(|n| n.name()) else {
                    return;
                };
                let name = name_text(&name);
                self.push(name.clone(), SymbolKind::Fragment, frag, None);
                self.add_selections(frag.selection_set(), &name);
            }
            cst::Definition::ObjectTypeDefinition(obj) => {
                if let Some(name) = obj.name() {
                    let name = name_text(&name);
                    self.push(name.clone(), SymbolKind::Type, obj, None);
                    self.add_fields(obj.fields_definition(), &name);
                }
            }
            cst::Definition::ObjectTypeExtension(ext) => {
                if let Some(name) = ext.name() {
                    let name = name_text(&name);
                    self.push(name.clone(), SymbolKind::Type, ext, None);
                    self.add_fields(ext.fields_definition(), &name);
                }
            }
            cst::Definition::InterfaceTypeDefinition(iface) => {
                if let Some(name) = iface.name() {
                    let name = name_text(&name);
                    self.push(name.clone(), SymbolKind::Interface, iface, None);
                    self.add_fields(iface.fields_definition(), &name);
                }
            }
            cst::Definition::InputObjectTypeDefinition(input) => {
                if let Some(name) = input.name() {
                    let name = name_text(&name);
                    self.push(name.clone(), SymbolKind::Input, input, None);
                    if let Some(fields) = input.input_fields_definition() {
                        for field in fields.input_value_definitions() {
                            if let Some(field_name) = field.name() {
                                self.push(name_text(&field_name), SymbolKind::Field, &field, Some(&name));
                            }
                        }
                    }
                }
            }
            cst::Definition::EnumTypeDefinition(enum_def) => {
                if let Some(name) = enum_def.name() {
                    let name = name_text(&name);
                    self.push(name.clone(), SymbolKind::Enum, enum_def, None);
                    if let Some(values) = enum_def.enum_values_definition() {
                        for value in values.enum_value_definitions() {
                            let value_name = value.enum_value().and_then(|v| v.name());
                            if let Some(value_name) = value_name {
                                self.push(
                                    name_text(&value_name),
                                    SymbolKind::EnumValue,
                                    &value,
                                    Some(&name),
                                );
                            }
                        }
                    }
                }
            }
            cst::Definition::UnionTypeDefinition(union) => {
                if let Some(name) = union.name() {
                    self.push(name_text(&name), SymbolKind::Union, union, None);
                }
            }
            cst::Definition::ScalarTypeDefinition(scalar) => {
                if let Some(name) = scalar.name() {
                    self.push(name_text(&name), SymbolKind::Scalar, scalar, None);
                }
            }
            cst::Definition::DirectiveDefinition(directive) => {
                if let Some(name) = directive.name() {
                    self.push(format!("@{}", name_text(&name)), SymbolKind::Directive, directive, None);
                }
            }
            _ => {}
        }
    }

    fn add_fields(&mut self, fields: Option<cst::FieldsDefinition>, container: &str) {
        let Some(fields) = fields else {
            return;
        };
        for field in fields.field_definitions() {
            if let Some(name) = field.name() {
                self.push(name_text(&name), SymbolKind::Field, &field, Some(container));
            }
        }
    }

    /// Top-level field selections of an operation or fragment.
    fn add_selections(&mut self, selection_set: Option<cst::SelectionSet>, container: &str) {
        let Some(selection_set) = selection_set else {
            return;
        };
        for selection in selection_set.selections() {
            if let cst::Selection::Field(field) = selection {
                // Aliased selections are listed under their alias
                let name = field
                    .alias()
                    .and_then(|alias| alias.name())
                    .or_else(|| field.name());
                if let Some(name) = name {
                    self.push(name_text(&name), SymbolKind::Field, &field, Some(container));
                }
            }
        }
    }
}
