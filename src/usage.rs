/// Does the spelling of `name` export it from its package
pub fn is_exported(name: &str) -> bool {
    name.chars().next()
        .map_or(false, char::is_uppercase)
}

/// Does a freshly declared `name` start out as used
///
/// Only declarations in the package top level (`root`) can be used
/// implicitly: `init` always runs, `main` runs in the entry package,
/// and exported names of library packages are reachable from outside.
pub fn initially_used(name: &str, root: bool, entry: bool) -> bool {
    if !root {
        return false;
    }
    match name {
        "init" => true,
        "main" if entry => true,
        _ => !entry && is_exported(name),
    }
}
