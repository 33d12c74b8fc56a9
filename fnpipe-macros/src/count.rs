//! Counting references to a pipeline stage closure's argument.
//!
//! The chain rewriter decides how to inline a closure stage based on how
//! many times the closure body actually reads its argument: zero uses is a
//! programmer error, one use allows a direct splice, and two or more uses
//! require a binding so the piped value is evaluated only once.
//!
//! Counting is scope-aware: a reference only counts while the stage
//! argument is the binding in scope. Nested closures, `let` statements,
//! `match` arms, `if let` conditions, and `for` loops that rebind the same
//! identifier shadow it for the extent of their scope. References hidden
//! inside foreign macro tokens cannot be counted individually, so they are
//! reported as a separate flag.

use proc_macro2::{Literal, TokenStream, TokenTree};
use syn::visit::{self, Visit};
use syn::{
    Arm, Block, Expr, ExprClosure, ExprForLoop, ExprIf, ExprPath, ExprWhile, Ident, Macro, Pat,
    Stmt,
};

/// How a closure body refers to its argument.
pub struct ArgumentUses {
    /// References visible to the tree walk as path expressions.
    pub direct: usize,
    /// Whether the argument is mentioned inside a foreign macro invocation,
    /// either as a bare token or as an inline format capture (`"{x}"`).
    pub in_macro_tokens: bool,
}

/// Counts how many times `argument` is referenced within `body`.
///
/// References under a rebinding of the same identifier are shadowed and
/// therefore not counted.
pub fn count_argument_uses(body: &Expr, argument: &Ident) -> ArgumentUses {
    let mut counter = ArgumentUseCounter {
        argument,
        uses: ArgumentUses {
            direct: 0,
            in_macro_tokens: false,
        },
    };
    counter.visit_expr(body);
    counter.uses
}

struct ArgumentUseCounter<'a> {
    argument: &'a Ident,
    uses: ArgumentUses,
}

impl<'ast> Visit<'ast> for ArgumentUseCounter<'_> {
    fn visit_expr_path(&mut self, expression: &'ast ExprPath) {
        if is_argument_reference(expression, self.argument) {
            self.uses.direct += 1;
        }
        visit::visit_expr_path(self, expression);
    }

    fn visit_macro(&mut self, invocation: &'ast Macro) {
        if tokens_mention_argument(invocation.tokens.clone(), self.argument) {
            self.uses.in_macro_tokens = true;
        }
        visit::visit_macro(self, invocation);
    }

    fn visit_expr_closure(&mut self, closure: &'ast ExprClosure) {
        if shadows_argument(closure, self.argument) {
            return;
        }
        visit::visit_expr_closure(self, closure);
    }

    // A `let` that rebinds the argument shadows it for the rest of the
    // block; its own initializer still sees the outer binding.
    fn visit_block(&mut self, block: &'ast Block) {
        for statement in &block.stmts {
            self.visit_stmt(statement);
            if rebinds_for_rest_of_block(statement, self.argument) {
                return;
            }
        }
    }

    fn visit_arm(&mut self, arm: &'ast Arm) {
        if pattern_binds(&arm.pat, self.argument) {
            return;
        }
        visit::visit_arm(self, arm);
    }

    fn visit_expr_for_loop(&mut self, loop_expression: &'ast ExprForLoop) {
        self.visit_expr(&loop_expression.expr);
        if pattern_binds(&loop_expression.pat, self.argument) {
            return;
        }
        self.visit_block(&loop_expression.body);
    }

    fn visit_expr_if(&mut self, expression: &'ast ExprIf) {
        self.visit_expr(&expression.cond);
        if !condition_rebinds(&expression.cond, self.argument) {
            self.visit_block(&expression.then_branch);
        }
        if let Some((_, else_branch)) = &expression.else_branch {
            self.visit_expr(else_branch);
        }
    }

    fn visit_expr_while(&mut self, expression: &'ast ExprWhile) {
        self.visit_expr(&expression.cond);
        if !condition_rebinds(&expression.cond, self.argument) {
            self.visit_block(&expression.body);
        }
    }
}

/// Whether a path expression is a bare reference to `argument`.
pub fn is_argument_reference(expression: &ExprPath, argument: &Ident) -> bool {
    expression.qself.is_none() && expression.path.is_ident(argument)
}

/// Whether a nested closure rebinds `argument` in its parameter list,
/// shadowing the outer stage argument for the extent of its body.
pub fn shadows_argument(closure: &ExprClosure, argument: &Ident) -> bool {
    closure
        .inputs
        .iter()
        .any(|pattern| pattern_binds(pattern, argument))
}

/// Whether a statement rebinds `argument` for the statements after it.
pub fn rebinds_for_rest_of_block(statement: &Stmt, argument: &Ident) -> bool {
    matches!(statement, Stmt::Local(local) if pattern_binds(&local.pat, argument))
}

/// Whether an `if let`/`while let` condition rebinds `argument` for the
/// guarded block. Let-chain conditions rebind if any link does.
pub fn condition_rebinds(condition: &Expr, argument: &Ident) -> bool {
    match condition {
        Expr::Let(let_expression) => pattern_binds(&let_expression.pat, argument),
        Expr::Binary(binary) => {
            condition_rebinds(&binary.left, argument) || condition_rebinds(&binary.right, argument)
        }
        Expr::Paren(parenthesized) => condition_rebinds(&parenthesized.expr, argument),
        _ => false,
    }
}

/// Whether a pattern binds `argument`.
pub fn pattern_binds(pattern: &Pat, argument: &Ident) -> bool {
    match pattern {
        Pat::Ident(binding) => {
            binding.ident == *argument
                || binding
                    .subpat
                    .as_ref()
                    .is_some_and(|(_, subpattern)| pattern_binds(subpattern, argument))
        }
        Pat::Type(typed) => pattern_binds(&typed.pat, argument),
        Pat::Reference(reference) => pattern_binds(&reference.pat, argument),
        Pat::Paren(parenthesized) => pattern_binds(&parenthesized.pat, argument),
        Pat::Or(alternatives) => alternatives
            .cases
            .iter()
            .any(|case| pattern_binds(case, argument)),
        Pat::Tuple(tuple) => tuple
            .elems
            .iter()
            .any(|element| pattern_binds(element, argument)),
        Pat::TupleStruct(tuple_struct) => tuple_struct
            .elems
            .iter()
            .any(|element| pattern_binds(element, argument)),
        Pat::Slice(slice) => slice
            .elems
            .iter()
            .any(|element| pattern_binds(element, argument)),
        Pat::Struct(structure) => structure
            .fields
            .iter()
            .any(|field| pattern_binds(&field.pat, argument)),
        _ => false,
    }
}

fn tokens_mention_argument(tokens: TokenStream, argument: &Ident) -> bool {
    tokens.into_iter().any(|token| match token {
        TokenTree::Ident(identifier) => identifier == *argument,
        TokenTree::Group(group) => tokens_mention_argument(group.stream(), argument),
        TokenTree::Literal(literal) => literal_captures_argument(&literal, argument),
        TokenTree::Punct(_) => false,
    })
}

// Inline format captures: "{x}", "{x:?}", "{x:>8}". An escaped "{{x}}" also
// matches; that only costs the inlining, never correctness.
fn literal_captures_argument(literal: &Literal, argument: &Ident) -> bool {
    let text = literal.to_string();
    let name = argument.to_string();
    text.match_indices(name.as_str()).any(|(start, _)| {
        text[..start].ends_with('{')
            && matches!(text[start + name.len()..].chars().next(), Some('}' | ':'))
    })
}
