//! Substituting a pipeline stage closure's argument with an expression.
//!
//! Given the body of a single-argument closure, the substituter replaces
//! every reference to the argument: the first reference (in traversal order)
//! receives the primary replacement, and every later reference receives the
//! subsequent replacement. The chain rewriter passes the accumulated
//! pipeline expression as the primary replacement and, when the argument
//! is used more than once, a hidden binding name as the subsequent one, so
//! the pipeline value is evaluated exactly once no matter how often the
//! closure body mentions it.
//!
//! Substitution follows the same scope rules as the argument-use counter:
//! a reference under a rebinding of the same identifier belongs to the
//! rebinding, not the stage argument, and is left untouched.

use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{Arm, Block, Expr, ExprForLoop, ExprIf, ExprWhile, Ident};

use crate::count::{
    condition_rebinds, is_argument_reference, pattern_binds, rebinds_for_rest_of_block,
    shadows_argument,
};

/// Internal-contract failure: a multi-use closure body reached the
/// substituter without a subsequent replacement. The chain rewriter counts
/// uses first, so this is unreachable unless a caller misuses the engine.
pub const MULTIPLE_REFERENCES_ERROR: &str = "This lambda contains multiple references to the arg";

/// Replaces references to `argument` within `body`.
///
/// The first reference becomes `value`; later references become
/// `subsequent_value`. Fails if a later reference exists but no
/// `subsequent_value` was supplied.
///
/// The spliced replacements are not re-traversed, so a replacement that
/// itself mentions an identifier spelled like the argument (for example an
/// accumulated expression built from the caller's own `x`) is never
/// substituted again. Scopes that rebind the argument are left untouched.
pub fn substitute_argument(
    body: &mut Expr,
    argument: &Ident,
    value: Expr,
    subsequent_value: Option<Expr>,
) -> syn::Result<()> {
    let mut substituter = ArgumentSubstituter {
        argument,
        value: Some(value),
        subsequent_value,
        error: None,
    };
    substituter.visit_expr_mut(body);
    match substituter.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

struct ArgumentSubstituter<'a> {
    argument: &'a Ident,
    /// Taken by the first reference; `None` afterwards.
    value: Option<Expr>,
    subsequent_value: Option<Expr>,
    error: Option<syn::Error>,
}

impl VisitMut for ArgumentSubstituter<'_> {
    fn visit_expr_mut(&mut self, expression: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        match expression {
            Expr::Path(path) if is_argument_reference(path, self.argument) => {
                if let Some(value) = self.value.take() {
                    *expression = value;
                } else if let Some(subsequent) = &self.subsequent_value {
                    *expression = subsequent.clone();
                } else {
                    self.error = Some(syn::Error::new(
                        expression.span(),
                        MULTIPLE_REFERENCES_ERROR,
                    ));
                }
            }
            Expr::Closure(closure) if shadows_argument(closure, self.argument) => {}
            _ => visit_mut::visit_expr_mut(self, expression),
        }
    }

    // Mirrors the counter: a `let` rebinding shadows the rest of the block,
    // after its initializer has been substituted into.
    fn visit_block_mut(&mut self, block: &mut Block) {
        for statement in &mut block.stmts {
            self.visit_stmt_mut(statement);
            if rebinds_for_rest_of_block(statement, self.argument) {
                return;
            }
        }
    }

    fn visit_arm_mut(&mut self, arm: &mut Arm) {
        if pattern_binds(&arm.pat, self.argument) {
            return;
        }
        visit_mut::visit_arm_mut(self, arm);
    }

    fn visit_expr_for_loop_mut(&mut self, loop_expression: &mut ExprForLoop) {
        self.visit_expr_mut(&mut loop_expression.expr);
        if pattern_binds(&loop_expression.pat, self.argument) {
            return;
        }
        self.visit_block_mut(&mut loop_expression.body);
    }

    fn visit_expr_if_mut(&mut self, expression: &mut ExprIf) {
        self.visit_expr_mut(&mut expression.cond);
        if !condition_rebinds(&expression.cond, self.argument) {
            self.visit_block_mut(&mut expression.then_branch);
        }
        if let Some((_, else_branch)) = &mut expression.else_branch {
            self.visit_expr_mut(else_branch);
        }
    }

    fn visit_expr_while_mut(&mut self, expression: &mut ExprWhile) {
        self.visit_expr_mut(&mut expression.cond);
        if !condition_rebinds(&expression.cond, self.argument) {
            self.visit_block_mut(&mut expression.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MULTIPLE_REFERENCES_ERROR, substitute_argument};
    use quote::ToTokens;
    use syn::{Expr, Ident, parse_quote};

    fn argument(name: &str) -> Ident {
        Ident::new(name, proc_macro2::Span::call_site())
    }

    fn tokens(expression: &Expr) -> String {
        expression.to_token_stream().to_string()
    }

    #[test]
    fn substitutes_single_reference() {
        let mut body: Expr = parse_quote!(x / 2);
        substitute_argument(&mut body, &argument("x"), parse_quote!((seed())), None).unwrap();
        let expected: Expr = parse_quote!((seed()) / 2);
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn substitutes_later_references_with_subsequent_value() {
        let mut body: Expr = parse_quote!(x + x + 2);
        substitute_argument(
            &mut body,
            &argument("x"),
            parse_quote!(bound),
            Some(parse_quote!(bound)),
        )
        .unwrap();
        let expected: Expr = parse_quote!(bound + bound + 2);
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn distinguishes_first_from_subsequent_replacement() {
        let mut body: Expr = parse_quote!(x * x);
        substitute_argument(
            &mut body,
            &argument("x"),
            parse_quote!(first),
            Some(parse_quote!(rest)),
        )
        .unwrap();
        let expected: Expr = parse_quote!(first * rest);
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn fails_on_second_reference_without_subsequent_value() {
        let mut body: Expr = parse_quote!(x + x);
        let error = substitute_argument(&mut body, &argument("x"), parse_quote!(1), None)
            .expect_err("second reference must be rejected");
        assert_eq!(error.to_string(), MULTIPLE_REFERENCES_ERROR);
    }

    #[test]
    fn does_not_resubstitute_inside_spliced_replacement() {
        // The replacement mentions an `x` from the caller's scope; it must
        // survive a body that also ends with an `x` reference further on.
        let mut body: Expr = parse_quote!(f(x) + x);
        substitute_argument(
            &mut body,
            &argument("x"),
            parse_quote!((x + 1)),
            Some(parse_quote!(bound)),
        )
        .unwrap();
        let expected: Expr = parse_quote!(f((x + 1)) + bound);
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn leaves_shadowing_closures_untouched() {
        let mut body: Expr = parse_quote!(g(x, |x| x + 1));
        substitute_argument(&mut body, &argument("x"), parse_quote!(value), None).unwrap();
        let expected: Expr = parse_quote!(g(value, |x| x + 1));
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn stops_substituting_after_a_let_rebinding() {
        let mut body: Expr = parse_quote!({
            let x = x + 1;
            x * x
        });
        substitute_argument(&mut body, &argument("x"), parse_quote!((v)), None).unwrap();
        let expected: Expr = parse_quote!({
            let x = (v) + 1;
            x * x
        });
        assert_eq!(tokens(&body), tokens(&expected));
    }

    #[test]
    fn leaves_rebinding_match_arms_untouched() {
        let mut body: Expr = parse_quote!(match x {
            Some(x) => x,
            None => 0,
        });
        substitute_argument(&mut body, &argument("x"), parse_quote!(value), None).unwrap();
        let expected: Expr = parse_quote!(match value {
            Some(x) => x,
            None => 0,
        });
        assert_eq!(tokens(&body), tokens(&expected));
    }
}
