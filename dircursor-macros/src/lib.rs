mod utils;

use proc_macro::{TokenStream, TokenTree};

/// Awaits several futures concurrently on the current task.
///
/// Expands to a tuple of their outputs, in argument order. With a single
/// argument the future is simply awaited.
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return "()".parse().unwrap_or_default();
    }

    if count == 1 {
        let expr = utils::tokens_to_string(&args[0]);
        return format!("{{ {}.await }}", expr)
            .parse()
            .unwrap_or_else(|e| utils::compile_error(&format!("join macro error: {}", e)));
    }

    let mut output = String::new();
    output.push_str("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let idx = i + 1;
        let expr = utils::tokens_to_string(expr_tokens);
        output.push_str(&format!(
            "let mut __f{idx} = (::std::boxed::Box::pin({expr}), ::core::option::Option::None::<_>, false);\n"
        ));
    }

    output.push_str("::std::future::poll_fn(move |cx| {\n");
    output.push_str("    use ::std::task::Poll;\n");
    output.push_str("    use ::std::future::Future;\n");

    for i in 1..=count {
        output.push_str(&format!(
            "    if !__f{i}.2 {{\n\
                    if let Poll::Ready(val) = __f{i}.0.as_mut().poll(cx) {{\n\
                        __f{i}.1 = ::core::option::Option::Some(val);\n\
                        __f{i}.2 = true;\n\
                    }}\n\
                }}\n"
        ));
    }

    let all_done = (1..=count)
        .map(|i| format!("__f{i}.2"))
        .collect::<Vec<_>>()
        .join(" && ");

    output.push_str(&format!("    if {all_done} {{\n"));
    output.push_str("        Poll::Ready((\n");

    for i in 1..=count {
        output.push_str(&format!("            __f{i}.1.take().unwrap(),\n"));
    }

    output.push_str("        ))\n");
    output.push_str("    } else {\n");
    output.push_str("        Poll::Pending\n");
    output.push_str("    }\n");
    output.push_str("}).await\n");
    output.push_str("}\n");

    output
        .parse::<TokenStream>()
        .unwrap_or_else(|e| utils::compile_error(&format!("join macro error: {}", e)))
}

/// Runs an `async fn main` on a fresh runtime.
///
/// Accepts `blocking_threads = N` to cap the blocking pool.
///
/// ```rust,ignore
/// #[dircursor::main(blocking_threads = 2)]
/// async fn main() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match utils::RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return utils::compile_error(&msg),
    };

    match utils::wrap_body(item, &args.builder()) {
        Ok(tokens) => tokens.into_iter().collect(),
        Err(msg) => utils::compile_error(&msg),
    }
}

/// Turns an `async fn` into a `#[test]` running on a fresh runtime.
///
/// Accepts the same options as [`main`](macro@main).
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match utils::RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return utils::compile_error(&msg),
    };

    let tokens = match utils::wrap_body(item, &args.builder()) {
        Ok(tokens) => tokens,
        Err(msg) => return utils::compile_error(&msg),
    };

    let test_attr: TokenStream = "#[test]".parse().unwrap_or_default();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
