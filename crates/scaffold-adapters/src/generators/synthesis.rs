//! In-memory TypeScript source synthesis.
//!
//! Each [`SynthesisFn`] builds a [`SourceFile`] from imports and
//! statements, then prints it.

use scaffold_core::domain::{GeneratorContext, SynthesisFn};

/// A named import: `import { a, b } from "module";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub names: Vec<String>,
    pub module: String,
}

/// Minimal source-file model. Imports print first, one per line, followed
/// by a blank line and the statements in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    imports: Vec<Import>,
    statements: Vec<String>,
}

impl SourceFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add named imports from `module`. Names already imported from the
    /// same module are merged.
    pub fn import<I, S>(mut self, names: I, module: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let module = module.into();
        let names = names.into_iter().map(Into::into);
        match self.imports.iter_mut().find(|i| i.module == module) {
            Some(existing) => {
                for name in names {
                    if !existing.names.contains(&name) {
                        existing.names.push(name);
                    }
                }
            }
            None => self.imports.push(Import {
                names: names.collect(),
                module,
            }),
        }
        self
    }

    pub fn statement(mut self, text: impl Into<String>) -> Self {
        self.statements.push(text.into());
        self
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn print(&self) -> String {
        let mut out = String::new();
        for import in &self.imports {
            out.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                import.names.join(", "),
                import.module
            ));
        }
        if !self.imports.is_empty() && !self.statements.is_empty() {
            out.push('\n');
        }
        for statement in &self.statements {
            out.push_str(statement.trim_end_matches('\n'));
            out.push('\n');
        }
        out
    }
}

/// Run a synthesis function against the run context.
pub fn synthesize(function: SynthesisFn, ctx: &GeneratorContext) -> String {
    let file = match function {
        SynthesisFn::VitestConfig => vitest_config(),
        SynthesisFn::IndexTs => index_ts(ctx),
        SynthesisFn::TestFile => test_file(ctx),
        SynthesisFn::RegisterTs => register_ts(),
    };
    file.print()
}

fn vitest_config() -> SourceFile {
    SourceFile::new()
        .import(["defineConfig"], "vitest/config")
        .import(["sharedConfig"], "@mark1russell7/test")
        .statement(
            "export default defineConfig({\n  \
             ...sharedConfig,\n  \
             test: {\n    \
             ...sharedConfig.test,\n    \
             include: [\"src/**/*.test.ts\"],\n  \
             },\n\
             });",
        )
}

fn index_ts(ctx: &GeneratorContext) -> SourceFile {
    SourceFile::new()
        .statement(format!(
            "/**\n * {}\n *\n * @packageDocumentation\n */",
            ctx.full_package_name()
        ))
        .statement("")
        .statement("// Entry point\nexport {};")
}

fn test_file(ctx: &GeneratorContext) -> SourceFile {
    SourceFile::new()
        .import(["describe", "it", "expect"], "vitest")
        .statement(format!(
            "describe(\"{}\", () => {{\n  \
             it(\"should work\", () => {{\n    \
             expect(true).toBe(true);\n  \
             }});\n\
             }});",
            ctx.package_name()
        ))
}

fn register_ts() -> SourceFile {
    SourceFile::new()
        .import(["registerProcedures"], "@mark1russell7/client")
        .statement("// Register procedures here\nregisterProcedures([]);")
}
