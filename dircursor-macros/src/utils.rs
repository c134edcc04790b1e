use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Each argument is returned as a `Vec<TokenTree>`.
/// Commas at the top level are used as separators; commas nested in
/// groups are already hidden inside `TokenTree::Group`.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current);
                    current = Vec::new();
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Converts a slice of tokens into a Rust source string.
///
/// Spaces are inserted between consecutive identifiers to avoid
/// accidental token merging (e.g. `move async` vs `moveasync`).
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    let mut out = String::new();
    let mut prev_was_ident = false;

    for t in tokens {
        let needs_space = prev_was_ident && matches!(t, TokenTree::Ident(_));

        if needs_space {
            out.push(' ');
        }

        out.push_str(&t.to_string());
        prev_was_ident = matches!(t, TokenTree::Ident(_));
    }

    out
}

/// Runtime options accepted by `#[main]` and `#[test]`.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    pub(crate) blocking_threads: Option<usize>,
}

impl RuntimeArgs {
    /// Parses `blocking_threads = N`. Unknown keys are rejected.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = Self::default();

        for arg in split_args(attr) {
            let text = tokens_to_string(&arg);
            let Some((key, value)) = text.split_once('=') else {
                return Err(format!("expected `key = value`, found `{}`", text));
            };

            match key.trim() {
                "blocking_threads" => {
                    let n = value
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| format!("invalid blocking_threads `{}`", value.trim()))?;
                    args.blocking_threads = Some(n);
                }
                other => return Err(format!("unknown runtime option `{}`", other)),
            }
        }

        Ok(args)
    }

    /// Source of the expression building the runtime.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::dircursor::RuntimeBuilder::new()");

        if let Some(n) = self.blocking_threads {
            builder.push_str(&format!(".blocking_threads({})", n));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Rewrites an `async fn` item so that its body runs inside `block_on`.
///
/// The `async` keyword is removed and the body is wrapped with the given
/// runtime builder expression.
pub(crate) fn wrap_body(item: TokenStream, builder: &str) -> Result<Vec<TokenTree>, String> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if let Some(async_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(async_pos);
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return Err("expected a function body".to_owned());
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let new_block = format!(
        "{{
            let runtime = {};
            runtime
                .block_on(async move {{
                    {}
                }})
        }}",
        builder, block
    );

    let body = new_block
        .parse::<TokenStream>()
        .map_err(|e| format!("failed to wrap function body: {}", e))?;

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, body));

    Ok(tokens)
}

/// Expands to a `compile_error!` carrying `msg`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({:?});", msg)
        .parse()
        .unwrap_or_default()
}
