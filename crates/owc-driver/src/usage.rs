//! Usage and version text

use owc_generator::OUTPUT_REVISION;

/// Printed after usage errors and for `-h`
pub const USAGE: &str = "\
Usage: owc [options] <header-file>
  -o<file>           write output to file rather than stdout
  -I<dir>            add dir to the include path for header files
  -F<dir>            add dir to the framework include path
  -E                 preprocess only; do not generate wrapper code
  -D<macro>[=<def>]  define macro, with optional definition
  -U<macro>          undefine macro
  -i                 do not generate an #include statement
  -p<path>           path prefix for included file
  -f[<file>]         force #include, optional file name (overwrite default)
  -b<file>           prepend #include <file> (preserve default include)
  -nn                do not display notes
  -nw                do not display warnings
  @<file>            read additional options from file
  -v                 display version of owc
  --ignore-option-clashes
                     ignore later -f, -b, -p and -n options";

/// `-v`
pub fn version() -> String {
    format!(
        "Object Wrapper Compiler version {} (owc {})",
        OUTPUT_REVISION,
        env!("CARGO_PKG_VERSION")
    )
}
