//! RPC structural rules (spec §4.5 "RPC structure").
//!
//! A proc and a stream sharing one name inside the same `rpc` block are
//! rejected (E503); declaring more than one `input`/`output` block on a
//! single proc/stream is rejected (E701/E702). Field-name conflicts
//! within a block after spread expansion are handled by
//! [`super::type_refs`], which already walks both procs and streams.

use crate::analyzer::Program;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for r in program.rpcs.values() {
        for (name, proc) in &r.procs {
            if let Some(stream) = r.streams.get(name) {
                diagnostics.push(Diagnostic::new(
                    &stream.header.origin.range,
                    DiagnosticCode::E503ProcStreamNameCollision,
                    format!(
                        "`{name}` is declared both as a proc (at {}) and a stream in rpc `{}`",
                        proc.header.origin.range, r.header.name
                    ),
                ));
            }
            check_block_count(&proc.ast.input, "input", DiagnosticCode::E701MultipleInputBlocks, &proc.header.name, diagnostics);
            check_block_count(&proc.ast.output, "output", DiagnosticCode::E702MultipleOutputBlocks, &proc.header.name, diagnostics);
        }
        for stream in r.streams.values() {
            check_block_count(&stream.ast.input, "input", DiagnosticCode::E701MultipleInputBlocks, &stream.header.name, diagnostics);
            check_block_count(&stream.ast.output, "output", DiagnosticCode::E702MultipleOutputBlocks, &stream.header.name, diagnostics);
        }
    }
}

fn check_block_count(blocks: &[crate::ast::Block], kind: &str, code: DiagnosticCode, owner: &str, diagnostics: &mut Vec<Diagnostic>) {
    if blocks.len() <= 1 {
        return;
    }
    for extra in &blocks[1..] {
        diagnostics.push(Diagnostic::new(
            &extra.range,
            code,
            format!("`{owner}` declares more than one {kind} block; only the first is used"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Header, Origin, ProcSymbol, RpcSymbol, StreamSymbol};
    use crate::ast::{Block, ProcDecl, StreamDecl};
    use crate::position::{Position, Range};
    use std::collections::HashMap;

    fn range() -> Range {
        Range::point(Position::new("a.vdl", 1, 1, 0))
    }

    fn header(name: &str) -> Header {
        Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None }
    }

    #[test]
    fn proc_and_stream_sharing_a_name_collide() {
        let mut rpc = RpcSymbol { header: header("Svc"), procs: HashMap::new(), streams: HashMap::new(), declared_in: vec![] };
        rpc.procs.insert(
            "Ping".to_string(),
            ProcSymbol {
                header: header("Ping"),
                ast: ProcDecl { range: range(), docstring: None, deprecated: None, name: "Ping".to_string(), input: vec![], output: vec![] },
                input: vec![],
                output: vec![],
            },
        );
        rpc.streams.insert(
            "Ping".to_string(),
            StreamSymbol {
                header: header("Ping"),
                ast: StreamDecl { range: range(), docstring: None, deprecated: None, name: "Ping".to_string(), input: vec![], output: vec![] },
                input: vec![],
                output: vec![],
            },
        );
        let mut program = Program::default();
        program.rpcs.insert("Svc".to_string(), rpc);
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E503ProcStreamNameCollision);
    }

    #[test]
    fn multiple_input_blocks_flagged_once_per_extra() {
        let mut rpc = RpcSymbol { header: header("Svc"), procs: HashMap::new(), streams: HashMap::new(), declared_in: vec![] };
        let block = Block { range: range(), children: vec![] };
        rpc.procs.insert(
            "Ping".to_string(),
            ProcSymbol {
                header: header("Ping"),
                ast: ProcDecl {
                    range: range(),
                    docstring: None,
                    deprecated: None,
                    name: "Ping".to_string(),
                    input: vec![block.clone(), block.clone(), block],
                    output: vec![],
                },
                input: vec![],
                output: vec![],
            },
        );
        let mut program = Program::default();
        program.rpcs.insert("Svc".to_string(), rpc);
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code == DiagnosticCode::E701MultipleInputBlocks));
    }
}
