use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceMap, comments::SingleThreadedComments};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse JSX/TSX source code string into an AST.
///
/// Every unit gets its own `SourceMap`, so units can be parsed from several
/// rayon workers at once.
pub fn parse_jsx_source(code: String, file_path: &str) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), Some(&comments));

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedJSX { module, source_map })
    })
}
