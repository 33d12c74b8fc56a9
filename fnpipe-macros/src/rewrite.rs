//! Folding `pipe!` call sites into nested expressions.
//!
//! This module is the heart of the `#[fast_pipes]` attribute. It walks a
//! function body, finds every `pipe!` invocation, and folds the stage list
//! into one accumulated expression:
//!
//! ```text
//! pipe!(a, b, c, d)            =>  d(c(b(a)))
//! pipe!(a, b, |x| x + 1)       =>  (b(a)) + 1
//! pipe!(a, b, |x| x + x + 1)   =>  { let v = b(a); v + v + 1 }
//! ```
//!
//! Closure stages are spliced directly into the expression so no closure
//! call frame remains. A closure body that reads its argument more than once
//! gets a hidden `let` binding, so the piped value is still evaluated
//! exactly once. Stages are folded strictly left to right; later stages may
//! depend on side effects of earlier ones.

use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    Expr, ExprCall, ExprClosure, ExprParen, Ident, ItemFn, Macro, Pat, Path, Stmt, Token, Type,
    parse2, parse_quote_spanned, token,
};

use crate::count::count_argument_uses;
use crate::substitute::substitute_argument;

/// The call target the rewriter recognizes as a pipeline to fold.
const PIPE_MACRO_NAME: &str = "pipe";

/// The marker attribute, stripped from the rewritten function so stacked
/// markers cannot re-trigger the transformation.
const MARKER_NAME: &str = "fast_pipes";

/// A stage closure never reads the piped value; almost certainly a mistake.
pub const NO_ARGUMENT_USE_ERROR: &str = "This lambda has no arguments.";

/// A stage tries to splice a runtime sequence into the stage list, which
/// cannot be folded structurally.
pub const STARRED_STAGE_ERROR: &str =
    "pipe can't take a starred expression as an argument when fast_pipes is used.";

/// A closure stage whose parameter list the rewriter refuses to substitute.
pub const STAGE_ARITY_ERROR: &str = "pipe stage closures must take exactly one argument";

/// A `pipe!` call with no initial value.
pub const EMPTY_PIPE_ERROR: &str = "pipe! requires an initial value";

/// Implementation of the `#[fast_pipes]` attribute.
///
/// Parses the function, strips any remaining marker attributes, folds every
/// `pipe!` call site, and emits the rewritten function. On failure only
/// `compile_error!` tokens are emitted, carrying the offending span.
pub fn fast_pipes_impl(attribute: TokenStream, item: TokenStream) -> TokenStream {
    if !attribute.is_empty() {
        return syn::Error::new_spanned(attribute, "fast_pipes takes no arguments")
            .to_compile_error();
    }

    let mut function: ItemFn = match parse2(item) {
        Ok(function) => function,
        Err(error) => return error.to_compile_error(),
    };

    strip_marker(&mut function);

    let mut rewriter = PipeRewriter::default();
    rewriter.visit_block_mut(&mut function.block);

    match rewriter.error {
        Some(error) => error.to_compile_error(),
        None => function.into_token_stream(),
    }
}

/// Removes `fast_pipes` markers from the function's own attribute list,
/// written with or without invocation parentheses, plain or path-qualified.
fn strip_marker(function: &mut ItemFn) {
    function
        .attrs
        .retain(|attribute| !is_marker_path(attribute.path()));
}

fn is_marker_path(path: &Path) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == MARKER_NAME)
}

fn is_pipe_macro(path: &Path) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == PIPE_MACRO_NAME)
}

/// Rewrites every `pipe!` call site in a function body into a folded
/// expression.
#[derive(Default)]
struct PipeRewriter {
    /// Fresh-name counter for hidden bindings; one substitution never reuses
    /// another's name, even across nested pipelines.
    binding_counter: usize,
    /// First failure encountered; stops further rewriting.
    error: Option<syn::Error>,
}

impl VisitMut for PipeRewriter {
    fn visit_expr_mut(&mut self, expression: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        if let Expr::Macro(macro_expression) = expression {
            if is_pipe_macro(&macro_expression.mac.path) {
                let span = macro_expression.mac.span();
                match self.fold_pipe_call(&macro_expression.mac) {
                    // Parenthesized so the splice never rebinds precedence
                    // in the surrounding expression.
                    Ok(folded) => *expression = parenthesized(folded, span),
                    Err(error) => self.error = Some(error),
                }
                return;
            }
        }
        visit_mut::visit_expr_mut(self, expression);
    }

    fn visit_stmt_mut(&mut self, statement: &mut Stmt) {
        if self.error.is_some() {
            return;
        }
        let folded = match statement {
            Stmt::Macro(macro_statement) if is_pipe_macro(&macro_statement.mac.path) => {
                let span = macro_statement.mac.span();
                match self.fold_pipe_call(&macro_statement.mac) {
                    Ok(folded) => Some((parenthesized(folded, span), macro_statement.semi_token)),
                    Err(error) => {
                        self.error = Some(error);
                        return;
                    }
                }
            }
            _ => None,
        };
        match folded {
            Some((expression, semi_token)) => *statement = Stmt::Expr(expression, semi_token),
            None => visit_mut::visit_stmt_mut(self, statement),
        }
    }
}

impl PipeRewriter {
    /// Folds one `pipe!` call site into a single accumulated expression.
    fn fold_pipe_call(&mut self, invocation: &Macro) -> syn::Result<Expr> {
        let parser = Punctuated::<Expr, Token![,]>::parse_terminated;
        let arguments = parser.parse2(invocation.tokens.clone())?;

        let mut arguments = arguments.into_iter();
        let Some(mut accumulated) = arguments.next() else {
            return Err(syn::Error::new(invocation.span(), EMPTY_PIPE_ERROR));
        };
        self.rewrite_nested(&mut accumulated)?;

        for mut stage in arguments {
            // Nested pipelines inside a stage expression fold first.
            self.rewrite_nested(&mut stage)?;
            accumulated = self.fold_stage(stage, accumulated)?;
        }
        Ok(accumulated)
    }

    fn rewrite_nested(&mut self, expression: &mut Expr) -> syn::Result<()> {
        self.visit_expr_mut(expression);
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Wraps the accumulated expression in one more stage.
    fn fold_stage(&mut self, stage: Expr, accumulated: Expr) -> syn::Result<Expr> {
        match stage {
            // `..stages` is the spread shape; a range is never a callable,
            // and the stage list cannot be folded structurally.
            Expr::Range(range) => Err(syn::Error::new(range.span(), STARRED_STAGE_ERROR)),
            Expr::Closure(closure) if closure.asyncness.is_none() => {
                self.inline_closure_stage(closure, accumulated)
            }
            other => Ok(wrap_call(other, accumulated)),
        }
    }

    /// Splices a closure stage's body in place of a call to it.
    fn inline_closure_stage(
        &mut self,
        closure: ExprClosure,
        accumulated: Expr,
    ) -> syn::Result<Expr> {
        let span = closure.span();
        let argument = stage_argument(&closure)?;
        let uses = count_argument_uses(&closure.body, &argument.name);

        // Foreign macro tokens cannot be substituted into; keep the closure
        // as an ordinary call so its argument still binds the piped value.
        if uses.in_macro_tokens {
            return Ok(wrap_call(Expr::Closure(closure), accumulated));
        }

        let mut body = *closure.body;
        match uses.direct {
            0 => Err(syn::Error::new(span, NO_ARGUMENT_USE_ERROR)),
            // Single bare use: substitute the accumulated expression
            // directly. No binding, no call. An annotated parameter keeps
            // its type through a binding instead, so inference driven by
            // the annotation still applies to the piped value.
            1 if argument.annotation.is_none() => {
                substitute_argument(
                    &mut body,
                    &argument.name,
                    parenthesized(accumulated, span),
                    None,
                )?;
                Ok(body)
            }
            _ => {
                // Bind the accumulated expression once and substitute the
                // hidden name everywhere.
                let binding = self.fresh_binding_name(span);
                let reference: Expr = parse_quote_spanned!(span=> #binding);
                substitute_argument(&mut body, &argument.name, reference.clone(), Some(reference))?;
                Ok(match argument.annotation {
                    Some(annotation) => parse_quote_spanned!(
                        span=> { let #binding: #annotation = #accumulated; #body }
                    ),
                    None => parse_quote_spanned!(span=> { let #binding = #accumulated; #body }),
                })
            }
        }
    }

    fn fresh_binding_name(&mut self, span: Span) -> Ident {
        let identifier = Ident::new(&format!("__fnpipe_piped_{}", self.binding_counter), span);
        self.binding_counter += 1;
        identifier
    }
}

/// The single parameter of a closure stage.
struct StageArgument {
    name: Ident,
    annotation: Option<Type>,
}

/// Extracts the single parameter of a closure stage, rejecting every
/// parameter-list shape the substituter could mis-handle.
fn stage_argument(closure: &ExprClosure) -> syn::Result<StageArgument> {
    let mut inputs = closure.inputs.iter();
    let (Some(pattern), None) = (inputs.next(), inputs.next()) else {
        return Err(syn::Error::new(closure.span(), STAGE_ARITY_ERROR));
    };
    let (pattern, annotation) = match pattern {
        Pat::Type(typed) => (&*typed.pat, Some((*typed.ty).clone())),
        other => (other, None),
    };
    match pattern {
        Pat::Ident(binding) if binding.subpat.is_none() => Ok(StageArgument {
            name: binding.ident.clone(),
            annotation,
        }),
        // `|_| ...` can never read the piped value.
        Pat::Wild(_) => Err(syn::Error::new(closure.span(), NO_ARGUMENT_USE_ERROR)),
        other => Err(syn::Error::new(other.span(), STAGE_ARITY_ERROR)),
    }
}

/// `accumulated = stage(accumulated)`, parenthesizing the callee only where
/// token printing would otherwise change the meaning.
fn wrap_call(stage: Expr, accumulated: Expr) -> Expr {
    let span = stage.span();
    let callee = if callee_needs_parens(&stage) {
        parenthesized(stage, span)
    } else {
        stage
    };
    let mut arguments = Punctuated::new();
    arguments.push(accumulated);
    Expr::Call(ExprCall {
        attrs: Vec::new(),
        func: Box::new(callee),
        paren_token: token::Paren(span),
        args: arguments,
    })
}

fn callee_needs_parens(stage: &Expr) -> bool {
    // `a.f` printed as callee would re-parse as a method call; operators
    // would swallow the call parentheses. Paths and call forms are safe.
    !matches!(
        stage,
        Expr::Path(_) | Expr::Call(_) | Expr::MethodCall(_) | Expr::Paren(_) | Expr::Macro(_)
    )
}

fn parenthesized(expression: Expr, span: Span) -> Expr {
    Expr::Paren(ExprParen {
        attrs: Vec::new(),
        paren_token: token::Paren(span),
        expr: Box::new(expression),
    })
}
