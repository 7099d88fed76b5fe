//! C# source printer for synthesized declarations.
//!
//! Every type is spelled through the shortening policy with the emission
//! context of the member being printed, so a method's own generic parameters
//! are visible to the types in its signature and body.

use crate::ir::{
    ConstructorDeclaration, Declaration, EventDeclaration, Expr, FieldDeclaration,
    MethodDeclaration, PropertyDeclaration, PropertyName, Statement,
};
use crate::shorten::{EmissionContext, ShorteningPolicy};
use psynth_common::{GenericParameter, Parameter, SynthesisOptions, TypeReference};

/// Reserved words that need an `@` prefix when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub fn escape_identifier(name: &str) -> String {
    if RESERVED_WORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

pub struct DeclarationPrinter<'s> {
    policy: ShorteningPolicy<'s>,
    /// Context of the enclosing class.
    class_context: EmissionContext,
    /// Context of the member currently being printed.
    context: EmissionContext,
    output: String,
    indent_str: String,
    new_line: &'static str,
    indent_level: u32,
}

impl<'s> DeclarationPrinter<'s> {
    pub fn new(
        policy: ShorteningPolicy<'s>,
        class_context: EmissionContext,
        options: &SynthesisOptions,
    ) -> Self {
        Self {
            policy,
            context: class_context.clone(),
            class_context,
            output: String::new(),
            indent_str: " ".repeat(options.indent_width),
            new_line: options.new_line.as_str(),
            indent_level: 0,
        }
    }

    /// Start at `level` indents, e.g. 1 for members directly inside a
    /// namespace-less class.
    pub const fn with_indent_level(mut self, level: u32) -> Self {
        self.indent_level = level;
        self
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn take_output(self) -> String {
        self.output
    }

    /// Print `declarations` in order. Consecutive fields stay together; other
    /// members are separated by a blank line.
    pub fn print_all<'d>(&mut self, declarations: impl IntoIterator<Item = &'d Declaration>) {
        let mut previous_was_field = None;
        for declaration in declarations {
            match previous_was_field {
                Some(true) if declaration.is_field() => {}
                Some(_) => self.write_line(),
                None => {}
            }
            self.print(declaration);
            previous_was_field = Some(declaration.is_field());
        }
    }

    pub fn print(&mut self, declaration: &Declaration) {
        self.context = self.class_context.clone();
        match declaration {
            Declaration::Field(field) => self.print_field(field),
            Declaration::Constructor(ctor) => self.print_constructor(ctor),
            Declaration::Method(method) => self.print_method(method),
            Declaration::Property(property) => self.print_property(property),
            Declaration::Event(event) => self.print_event(event),
        }
    }

    fn print_field(&mut self, field: &FieldDeclaration) {
        self.write_indent();
        self.write("private ");
        if field.readonly {
            self.write("readonly ");
        }
        self.write_type(&field.ty);
        self.write(" ");
        self.write(&escape_identifier(&field.name));
        self.write(";");
        self.write_line();
    }

    fn print_constructor(&mut self, ctor: &ConstructorDeclaration) {
        self.write_indent();
        self.write("public ");
        self.write(&escape_identifier(&ctor.class_name));
        self.write("(");
        self.emit_parameters(&ctor.parameters);
        self.write(")");
        self.write_line();
        self.emit_block(&ctor.body);
    }

    fn print_method(&mut self, method: &MethodDeclaration) {
        self.context = self
            .class_context
            .nested(method.type_parameters.iter().map(|p| p.name.as_str()));

        self.write_indent();
        if let Some(keyword) = method.accessibility.keyword() {
            self.write(keyword);
            self.write(" ");
        }
        if method.is_async {
            self.write("async ");
        }
        self.write_type(&method.return_type);
        self.write(" ");
        self.emit_explicit_qualifier(method.explicit_interface.as_ref());
        self.write(&escape_identifier(&method.name));
        self.emit_type_parameter_list(&method.type_parameters);
        self.write("(");
        self.emit_parameters(&method.parameters);
        self.write(")");
        // Explicit implementations inherit their constraints.
        if method.explicit_interface.is_none() {
            self.emit_constraint_clauses(&method.type_parameters);
        }
        self.write_line();
        self.emit_block(&method.body);
    }

    fn print_property(&mut self, property: &PropertyDeclaration) {
        self.write_indent();
        if let Some(keyword) = property.accessibility.keyword() {
            self.write(keyword);
            self.write(" ");
        }
        self.write_type(&property.ty);
        self.write(" ");
        self.emit_explicit_qualifier(property.explicit_interface.as_ref());
        match &property.name {
            PropertyName::Named(name) => self.write(&escape_identifier(name)),
            PropertyName::Indexer(parameters) => {
                self.write("this[");
                self.emit_parameters(parameters);
                self.write("]");
            }
        }
        self.write_line();
        self.open_brace();
        if let Some(body) = &property.getter {
            self.emit_accessor("get", body);
        }
        if let Some(body) = &property.setter {
            self.emit_accessor("set", body);
        }
        self.close_brace();
    }

    fn print_event(&mut self, event: &EventDeclaration) {
        self.write_indent();
        if let Some(keyword) = event.accessibility.keyword() {
            self.write(keyword);
            self.write(" ");
        }
        self.write("event ");
        self.write_type(&event.ty);
        self.write(" ");
        self.emit_explicit_qualifier(event.explicit_interface.as_ref());
        self.write(&escape_identifier(&event.name));
        self.write_line();
        self.open_brace();
        self.emit_accessor("add", &event.add);
        self.emit_accessor("remove", &event.remove);
        self.close_brace();
    }

    /// `get { return ...; }` on one line.
    fn emit_accessor(&mut self, keyword: &str, body: &[Statement]) {
        self.write_indent();
        self.write(keyword);
        self.write(" {");
        for statement in body {
            self.write(" ");
            self.emit_statement(statement);
        }
        self.write(" }");
        self.write_line();
    }

    fn emit_block(&mut self, body: &[Statement]) {
        self.open_brace();
        for statement in body {
            self.write_indent();
            self.emit_statement(statement);
            self.write_line();
        }
        self.close_brace();
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Return(expr) => {
                self.write("return ");
                self.emit_expr(expr);
            }
            Statement::Expression(expr) => self.emit_expr(expr),
        }
        self.write(";");
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => self.write(&escape_identifier(name)),
            Expr::This => self.write("this"),
            Expr::MemberAccess { target, name } => {
                self.emit_expr(target);
                self.write(".");
                self.write(&escape_identifier(name));
            }
            Expr::ElementAccess { target, arguments } => {
                self.emit_expr(target);
                self.write("[");
                self.emit_comma_separated(arguments);
                self.write("]");
            }
            Expr::Invocation {
                callee,
                type_arguments,
                arguments,
            } => {
                self.emit_expr(callee);
                if !type_arguments.is_empty() {
                    self.write("<");
                    for (i, ty) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.write_type(ty);
                    }
                    self.write(">");
                }
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            Expr::Lambda { body } => {
                self.write("() => ");
                self.emit_expr(body);
            }
            Expr::Assign { target, value } => {
                self.emit_expr(target);
                self.write(" = ");
                self.emit_expr(value);
            }
            Expr::CompoundAssign {
                target,
                operator,
                value,
            } => {
                self.emit_expr(target);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expr(value);
            }
            Expr::Await(inner) => {
                self.write("await ");
                self.emit_expr(inner);
            }
            Expr::Cast { ty, expr } => {
                self.write("((");
                self.write_type(ty);
                self.write(")");
                self.emit_expr(expr);
                self.write(")");
            }
            Expr::New { ty, arguments } => {
                self.write("new ");
                self.write_type(ty);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
        }
    }

    fn emit_comma_separated(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(expr);
        }
    }

    fn emit_parameters(&mut self, parameters: &[Parameter]) {
        for (i, param) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(keyword) = param.modifier.keyword() {
                self.write(keyword);
                self.write(" ");
            }
            self.write_type(&param.ty);
            self.write(" ");
            self.write(&escape_identifier(&param.name));
            if let Some(default) = &param.default_value {
                self.write(" = ");
                self.write(default);
            }
        }
    }

    fn emit_type_parameter_list(&mut self, type_parameters: &[GenericParameter]) {
        if type_parameters.is_empty() {
            return;
        }
        self.write("<");
        for (i, param) in type_parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name);
        }
        self.write(">");
    }

    fn emit_constraint_clauses(&mut self, type_parameters: &[GenericParameter]) {
        for param in type_parameters.iter().filter(|p| !p.constraints.is_empty()) {
            self.write(" where ");
            self.write(&param.name);
            self.write(" : ");
            for (i, constraint) in param.constraints.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                let text = self.policy.render_constraint(constraint, &self.context);
                self.write(&text);
            }
        }
    }

    fn emit_explicit_qualifier(&mut self, interface: Option<&TypeReference>) {
        if let Some(interface) = interface {
            self.write_type(interface);
            self.write(".");
        }
    }

    fn write_type(&mut self, ty: &TypeReference) {
        let text = self.policy.render(ty, &self.context);
        self.write(&text);
    }

    fn open_brace(&mut self) {
        self.write_indent();
        self.write("{");
        self.write_line();
        self.increase_indent();
    }

    fn close_brace(&mut self) {
        self.decrease_indent();
        self.write_indent();
        self.write("}");
        self.write_line();
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_line(&mut self) {
        self.output.push_str(self.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod printer_tests;
