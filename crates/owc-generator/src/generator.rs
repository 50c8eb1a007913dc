//! Wrapper code generation
//!
//! Writes the translation unit that accompanies a header: a banner, the
//! `#include` directives chosen by the include policy, a revision guard and
//! a small string table per wrapped class.

use owc_core::{text, BuildConfig};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use tracing::debug;

use crate::{ClassDef, WrapperKind};

/// Revision of the generated code layout
pub const OUTPUT_REVISION: u32 = 67;

/// Wrapper code generator
pub struct WrapperGenerator<'a> {
    config: &'a BuildConfig,
}

impl<'a> WrapperGenerator<'a> {
    /// Create a generator for the given run
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// Write wrapper code for `classes` to `out`. Class names keep the
    /// bytes they were read as.
    pub fn generate(&self, classes: &[ClassDef], out: &mut dyn Write) -> io::Result<()> {
        let mut code = String::new();
        self.render(classes, &mut code)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        out.write_all(&text::encode(&code))
    }

    fn render(&self, classes: &[ClassDef], out: &mut String) -> fmt::Result {
        let input = text::from_utf8(base_name(self.config.input_display_name()));
        writeln!(
            out,
            "/****************************************************************************"
        )?;
        writeln!(out, "** Wrapper code from reading C++ file '{}'", input)?;
        writeln!(out, "**")?;
        writeln!(
            out,
            "** Created by: The Object Wrapper Compiler version {} (owc {})",
            OUTPUT_REVISION,
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(out, "**")?;
        writeln!(out, "** WARNING! All changes made in this file will be lost!")?;
        writeln!(
            out,
            "*****************************************************************************/"
        )?;
        writeln!(out)?;

        for directive in self.include_directives() {
            writeln!(out, "{}", text::from_utf8(&directive))?;
        }

        writeln!(out, "#if !defined(OWC_OUTPUT_REVISION)")?;
        writeln!(
            out,
            "#error \"The header file '{}' doesn't include the wrapper support header.\"",
            input
        )?;
        writeln!(out, "#elif OWC_OUTPUT_REVISION != {}", OUTPUT_REVISION)?;
        writeln!(
            out,
            "#error \"This file was generated using owc revision {} and cannot be used with other revisions.\"",
            OUTPUT_REVISION
        )?;
        writeln!(out, "#endif")?;

        for class in classes {
            debug!("Generating wrapper for {}", class.qualified_name());
            writeln!(out)?;
            self.generate_class(class, out)?;
        }

        Ok(())
    }

    /// `#include` lines for the configured include files
    pub fn include_directives(&self) -> Vec<String> {
        if !self.config.emits_includes() {
            return Vec::new();
        }

        let mut prefix = self.config.include_prefix.clone().unwrap_or_default();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }

        self.config
            .include_files
            .iter()
            .map(|file| {
                if file.starts_with('<') || file.starts_with('"') {
                    format!("#include {}", file)
                } else if !prefix.is_empty() && prefix != "./" {
                    format!("#include \"{}{}\"", prefix, file)
                } else {
                    format!("#include \"{}\"", file)
                }
            })
            .collect()
    }

    fn generate_class(&self, class: &ClassDef, out: &mut String) -> fmt::Result {
        let qualified = class.qualified_name();
        let ident = qualified.replace("::", "__");
        let kind = match class.kind {
            WrapperKind::Object => "object",
            WrapperKind::Gadget => "gadget",
        };

        writeln!(
            out,
            "// Wrapper for {} {} declared at line {}",
            kind, qualified, class.line
        )?;
        writeln!(
            out,
            "static const char owc_stringdata_{}[] = \"{}\";",
            ident, qualified
        )?;
        writeln!(out)?;
        writeln!(out, "const char *{}::wrappedClassName()", qualified)?;
        writeln!(out, "{{")?;
        writeln!(out, "    return owc_stringdata_{};", ident)?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "const char *{}::wrappedSuperClassName()", qualified)?;
        writeln!(out, "{{")?;
        match class.superclasses.first() {
            Some(base) => writeln!(out, "    return \"{}\";", base)?,
            None => writeln!(out, "    return nullptr;")?,
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

/// Final path segment, accepting either separator
fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
