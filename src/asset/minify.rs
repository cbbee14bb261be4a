//! Bundle minification.
//!
//! JavaScript goes through oxc (parse, compress, mangle, print) and CSS
//! through lightningcss. Every step can refuse; callers fall back to the
//! unminified bundle on any [`MinifyError`].

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

use super::AssetType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinifyError {
    #[error("{kind} does not parse: {message}")]
    Parse { kind: AssetType, message: String },

    #[error("cannot print minified {0}: {1}")]
    Print(AssetType, String),

    #[error("minified {kind} is larger ({minified} > {original} bytes)")]
    Grew {
        kind: AssetType,
        original: usize,
        minified: usize,
    },
}

/// Minify a JavaScript bundle.
///
/// Parsed as a classic script: bundles are loaded with a plain `<script>`
/// tag, so top-level declarations are globals shared between the
/// concatenated files and keep their names.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::script()).parse();
    if let Some(first) = parsed.errors.first() {
        return Err(MinifyError::Parse {
            kind: AssetType::Script,
            message: first.to_string(),
        });
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let scoping = Minifier::new(options)
        .minify(&allocator, &mut program)
        .scoping;

    let printed = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(scoping)
        .build(&program);
    Ok(printed.code)
}

/// Minify a CSS bundle.
pub fn minify_css(source: &str) -> Result<String, MinifyError> {
    let sheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|err| MinifyError::Parse {
            kind: AssetType::Style,
            message: err.to_string(),
        })?;
    let printer = PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    };
    sheet
        .to_css(printer)
        .map(|out| out.code)
        .map_err(|err| MinifyError::Print(AssetType::Style, err.to_string()))
}

/// Minify a bundle of the given type.
///
/// Output that ends up longer than the input is refused.
pub fn minify_by_type(kind: AssetType, content: &str) -> Result<String, MinifyError> {
    let minified = match kind {
        AssetType::Style => minify_css(content)?,
        AssetType::Script => minify_js(content)?,
    };
    if minified.len() > content.len() {
        return Err(MinifyError::Grew {
            kind,
            original: content.len(),
            minified: minified.len(),
        });
    }
    Ok(minified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css() {
        let source = "/* editor */\nbody {\n  color: red;\n}\n\n.entry  p {\n  margin: 0 0 1em 0;\n}\n";
        let minified = minify_css(source).unwrap();
        assert!(minified.len() < source.len());
        assert!(minified.contains("color:red"));
        assert!(!minified.contains("editor"));
    }

    #[test]
    fn test_minify_js_keeps_globals() {
        let source = "// say hello\nfunction greet(name) {\n  var message = 'hello ' + name;\n  return message;\n}\n";
        let minified = minify_js(source).unwrap();
        assert!(minified.len() < source.len());
        assert!(minified.contains("greet"));
        assert!(!minified.contains("say hello"));
    }

    #[test]
    fn test_minify_js_keeps_unused_top_level() {
        let minified = minify_js("var jQueryPlugin = 1;\n").unwrap();
        assert!(minified.contains("jQueryPlugin"));

        let minified = minify_js("function initMenu(){ document.title='x'; }\n").unwrap();
        assert!(minified.contains("initMenu"));
        assert!(minified.contains("document.title"));
    }

    #[test]
    fn test_minify_css_rejects_late_import() {
        let err = minify_css("a{color:red}\n@import url(b.css);\n").unwrap_err();
        assert!(matches!(err, MinifyError::Parse { kind: AssetType::Style, .. }));
    }

    #[test]
    fn test_minify_js_rejects_invalid() {
        let err = minify_js("function (").unwrap_err();
        assert!(matches!(err, MinifyError::Parse { kind: AssetType::Script, .. }));
    }

    #[test]
    fn test_minify_by_type() {
        let css = "a {\n  color: blue;\n}\n";
        assert!(minify_by_type(AssetType::Style, css).is_ok());
        assert!(minify_by_type(AssetType::Script, "var = ;").is_err());
    }
}
