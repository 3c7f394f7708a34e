//!
//! rasfmt-macros
//! Checks `sprintf!` templates at compile time and builds the tagged
//! argument list that `rasfmt::format` consumes.
//!

extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse::{self, Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    spanned::Spanned,
    Expr, LitStr, Path, Token,
};

/// `sprintf!(buf, "template", args...) -> usize`, panicking on violations.
#[proc_macro]
pub fn sprintf(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as BufInput);
    let hook = quote!(::rasfmt::PanicOnViolation);
    expand(&input, |dst, template, args| {
        quote! { ::rasfmt::format_or_halt::<#hook>(#dst, #template, #args) }
    })
}

/// `sprintf_with!(Hook, buf, "template", args...) -> usize`.
#[proc_macro]
pub fn sprintf_with(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as HookInput);
    let hook = &input.hook;
    expand(&input.input, |dst, template, args| {
        quote! { ::rasfmt::format_or_halt::<#hook>(#dst, #template, #args) }
    })
}

/// `try_sprintf!(buf, "template", args...) -> rasfmt::Result<usize>`.
#[proc_macro]
pub fn try_sprintf(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as BufInput);
    expand(&input, |dst, template, args| {
        quote! { ::rasfmt::format(#dst, #template, #args) }
    })
}

fn expand<F>(input: &BufInput, f: F) -> TokenStream
where
    F: Fn(
        &proc_macro2::TokenStream,
        &proc_macro2::TokenStream,
        &proc_macro2::TokenStream,
    ) -> proc_macro2::TokenStream,
{
    let format = &input.input.format;
    let pieces = parse(&format.value());

    let argc: usize = input.input.args.len();
    let required_argc: usize = pieces.len();
    if argc != required_argc {
        return parse::Error::new(
            format.span(),
            format!(
                "format string required {} arguments but {} were supplied",
                required_argc, argc
            ),
        )
        .to_compile_error()
        .into();
    }

    let args: Vec<_> = pieces
        .iter()
        .zip(input.input.args.iter())
        .map(|(piece, arg)| piece.tokens(arg))
        .collect();

    let buf = &input.buf;
    let dst = rasfmt_ident("dst", buf.span());
    let bind = quote!(let #dst: &mut [u8] = #buf;);
    let call = f(
        &quote!(#dst),
        &quote!(#format.as_bytes()),
        &quote!(&[#(#args),*]),
    );
    let tokens = quote! { { #bind #call } };
    tokens.into()
}

fn rasfmt_ident(name: &str, span: Span) -> syn::Ident {
    syn::Ident::new(&format!("_rasfmt_{}", name), span)
}

struct Input {
    format: LitStr,
    _comma: Option<Token![,]>,
    args: Punctuated<Expr, Token![,]>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> parse::Result<Self> {
        let format = input.parse()?;
        if input.is_empty() {
            Ok(Input {
                format,
                _comma: None,
                args: Punctuated::new(),
            })
        } else {
            Ok(Input {
                format,
                _comma: input.parse()?,
                args: Punctuated::parse_terminated(input)?,
            })
        }
    }
}

struct BufInput {
    buf: Expr,
    input: Input,
}

impl Parse for BufInput {
    fn parse(input: ParseStream) -> parse::Result<Self> {
        let buf = input.parse()?;
        let _: Token![,] = input.parse()?;
        let input = Input::parse(input)?;
        Ok(BufInput { buf, input })
    }
}

struct HookInput {
    hook: Path,
    input: BufInput,
}

impl Parse for HookInput {
    fn parse(input: ParseStream) -> parse::Result<Self> {
        let hook = input.parse()?;
        let _: Token![,] = input.parse()?;
        let input = BufInput::parse(input)?;
        Ok(HookInput { hook, input })
    }
}

/// One argument-consuming conversion.
#[derive(Debug, PartialEq)]
enum Piece {
    Signed,
    Unsigned,
    Pointer,
    Char,
    Double,
    Str,
}

impl Piece {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'd' | 'i' | 'o' => Some(Piece::Signed),
            'u' | 'x' | 'X' => Some(Piece::Unsigned),
            'p' => Some(Piece::Pointer),
            'c' => Some(Piece::Char),
            'f' | 'F' | 'e' | 'E' => Some(Piece::Double),
            's' => Some(Piece::Str),
            _ => None,
        }
    }

    fn tokens(&self, arg: &Expr) -> proc_macro2::TokenStream {
        match self {
            Piece::Signed => quote!(::rasfmt::Arg::Int((#arg) as i64)),
            Piece::Unsigned => quote!(::rasfmt::Arg::Uint((#arg) as u64)),
            Piece::Pointer => quote!(::rasfmt::Arg::Ptr((#arg) as *const _ as *const u8 as usize)),
            Piece::Char => quote!(::rasfmt::Arg::Char((#arg) as u8)),
            Piece::Double => quote!(::rasfmt::Arg::Float((#arg) as f64)),
            Piece::Str => quote!(::rasfmt::Arg::Str(::core::convert::AsRef::<[u8]>::as_ref(#arg))),
        }
    }
}

/// Walks the template the way the runtime interpreter does and returns the
/// conversions that take an argument, in order. `%%`, unknown letters and a
/// specifier cut off by the end take none.
fn parse(format: &str) -> Vec<Piece> {
    let mut pieces = vec![];
    let mut chars = format.chars().take_while(|&c| c != '\0');
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        for c in chars.by_ref() {
            if c.is_ascii_digit() || c == '.' {
                continue;
            }
            if let Some(piece) = Piece::from_letter(c) {
                pieces.push(piece);
            }
            break;
        }
    }
    pieces
}
