//! Procedural macros for testkit-task
//!
//! This crate provides the `#[testkit_task::main]` attribute macro, which
//! turns a function building a suite into the program's entry point.
//!
//! # Example
//!
//! ```rust,ignore
//! use testkit_task::prelude::*;
//!
//! #[testkit_task::main(seed = 42)]
//! fn suite() -> DeferredTest {
//!     test("trivial", || equal(1, 1))
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, ItemFn, Lit, Token,
};

/// Configuration options for the main macro.
#[derive(Default)]
struct MainConfig {
    /// Fixed seed; when absent the seed comes from the environment
    seed: Option<u64>,
    /// Number of runs per fuzz test
    runs: Option<u32>,
}

impl Parse for MainConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = MainConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "seed" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Int(i) => config.seed = Some(i.base10_parse()?),
                        other => {
                            return Err(syn::Error::new_spanned(other, "seed must be an integer"))
                        }
                    }
                }
                "runs" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Int(i) => config.runs = Some(i.base10_parse()?),
                        other => {
                            return Err(syn::Error::new_spanned(other, "runs must be an integer"))
                        }
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Entry-point attribute for suites.
///
/// Apply it to a function taking no arguments and returning a
/// `DeferredTest`. The macro keeps the function and generates a `main` that
/// runs the suite against the real process and exits with its result.
///
/// # Configuration Options
///
/// - `seed = 42` - Fix the fuzz seed (default: `TESTKIT_TASK_SEED`, else the clock)
/// - `runs = 500` - Runs per fuzz test (default: `TESTKIT_TASK_FUZZ`, else 100)
///
/// ```rust,ignore
/// #[testkit_task::main(seed = 7, runs = 20)]
/// fn suite() -> DeferredTest {
///     fuzz("small", |rng| rng.gen_range(0..10), |n| is_true(n < 10, "too big"))
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as MainConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_main(&config, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_main(config: &MainConfig, input: &ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;

    if input.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "suite function must not be async; return a DeferredTest instead",
        ));
    }
    if !input.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "suite function must not take arguments",
        ));
    }
    if !input.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.generics,
            "suite function must not be generic",
        ));
    }
    if name == "main" {
        return Err(syn::Error::new_spanned(
            name,
            "suite function cannot be named `main`; the macro generates it",
        ));
    }

    let options = match (config.seed, config.runs) {
        (None, None) => quote! {
            ::testkit_task::program::RunOptions::from_environment(&env)
        },
        (None, Some(runs)) => quote! {
            ::testkit_task::program::RunOptions::from_environment(&env).with_runs(#runs)
        },
        (Some(seed), None) => quote! {
            ::testkit_task::program::RunOptions::new(#seed).with_env_runs(&env)
        },
        (Some(seed), Some(runs)) => quote! {
            ::testkit_task::program::RunOptions::new(#seed).with_runs(#runs)
        },
    };

    Ok(quote! {
        #input

        fn main() {
            let env = ::testkit_task::env::ProcessEnvironment::new();
            let options = #options;
            ::testkit_task::program::run_with_options(&env, options, #name());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{expand_main, MainConfig};

    #[test]
    fn test_config_parse_empty() {
        let config: MainConfig = syn::parse_str("").unwrap();
        assert!(config.seed.is_none());
        assert!(config.runs.is_none());
    }

    #[test]
    fn test_config_parse_multiple() {
        let config: MainConfig = syn::parse_str("seed = 42, runs = 7").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.runs, Some(7));
    }

    #[test]
    fn test_config_rejects_unknown() {
        assert!(syn::parse_str::<MainConfig>("flavor = \"multi_thread\"").is_err());
        assert!(syn::parse_str::<MainConfig>("seed = \"abc\"").is_err());
    }

    #[test]
    fn test_expand_rejects_async() {
        let item: syn::ItemFn =
            syn::parse_str("async fn suite() -> DeferredTest { todo!() }").unwrap();
        assert!(expand_main(&MainConfig::default(), &item).is_err());
    }

    #[test]
    fn test_expand_generates_main() {
        let item: syn::ItemFn = syn::parse_str("fn suite() -> DeferredTest { todo!() }").unwrap();
        let config = MainConfig {
            seed: Some(3),
            runs: None,
        };
        let out = expand_main(&config, &item).unwrap().to_string();
        assert!(out.contains("fn main"));
        assert!(out.contains("3u64"));
        assert!(out.contains("with_env_runs"));
        assert!(!out.contains("from_environment"));
    }

    #[test]
    fn test_expand_without_options_reads_environment() {
        let item: syn::ItemFn = syn::parse_str("fn suite() -> DeferredTest { todo!() }").unwrap();
        let out = expand_main(&MainConfig::default(), &item).unwrap().to_string();
        assert!(out.contains("from_environment"));
    }
}
