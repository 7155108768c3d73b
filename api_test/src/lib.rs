use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject a mock
/// backend along with a client pointed at it.
///
/// Injectable dependencies are [`wiremock::MockServer`] and
/// `crate::api::ApiClient`. Pass `admin` or `voter` to start the client with
/// the matching example session already attached.
#[proc_macro_attribute]
pub fn api_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the arguments to inject and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Sign the client in as admin/voter if needed.
    let maybe_session = match parse_macro_input!(args as Option<Ident>) {
        Some(arg) if arg == "admin" => quote! {
            let api_client = api_client.with_session(crate::session::Session::example_admin());
        },
        Some(arg) if arg == "voter" => quote! {
            let api_client = api_client.with_session(crate::session::Session::example_voter());
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `admin` or `voter`")
                .into_compile_error()
                .into();
        }
        None => TokenStream2::new(),
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (wiremock::MockServer, crate::api::ApiClient) {
                let mock_server = wiremock::MockServer::start().await;
                let config = crate::config::Config::with_api_url(format!("{}/api", mock_server.uri()));
                let api_client = crate::api::ApiClient::new(&config).unwrap();

                #maybe_session

                (mock_server, api_client)
            }

            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(["election_client"], None, None);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .thread_name("api-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                #[allow(unused_variables)]
                let (mock_server, api_client) = setup().await;
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_server = false;
    let mut has_client = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                if let Some(segment) = type_path.path.segments.last() {
                    if segment.ident == "MockServer" {
                        if has_server {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `wiremock::MockServer`",
                            ));
                        }
                        has_server = true;
                        args.push(quote! { mock_server });
                        continue;
                    } else if segment.ident == "ApiClient" {
                        if has_client {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `ApiClient`",
                            ));
                        }
                        has_client = true;
                        args.push(quote! { api_client });
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `server_ident: MockServer` or `client_ident: ApiClient`",
        ));
    }

    Ok(args)
}
