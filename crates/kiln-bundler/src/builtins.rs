//! Node.js built-in module names.

/// Public built-in modules of the supported Node.js releases.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Built-ins as external names, each bare and with the `node:` scheme.
pub fn node_builtin_externals() -> impl Iterator<Item = String> {
    NODE_BUILTINS
        .iter()
        .flat_map(|name| [(*name).to_string(), format!("node:{name}")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn externals_include_both_spellings() {
        let externals: Vec<String> = node_builtin_externals().collect();
        assert!(externals.contains(&"fs".to_string()));
        assert!(externals.contains(&"node:fs".to_string()));
        assert_eq!(externals.len(), NODE_BUILTINS.len() * 2);
    }
}
