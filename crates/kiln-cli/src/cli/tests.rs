#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let args = Cli::try_parse_from(["kiln"]).unwrap();
        assert!(!args.reset);
        assert!(!args.watch);
        assert!(!args.optimized);
        assert!(args.cwd.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.no_color);
    }

    #[test]
    fn test_all_flags() {
        let args = Cli::try_parse_from([
            "kiln",
            "--reset",
            "--watch",
            "--optimized",
            "--cwd",
            "packages/widgets",
        ])
        .unwrap();
        assert!(args.reset);
        assert!(args.watch);
        assert!(args.optimized);
        assert_eq!(args.cwd, Some(PathBuf::from("packages/widgets")));
    }

    #[test]
    fn test_prefix_flags() {
        let args = Cli::try_parse_from(["kiln", "--res", "--wat", "--opt"]).unwrap();
        assert!(args.reset);
        assert!(args.watch);
        assert!(args.optimized);
    }

    #[test]
    fn test_no_subcommands() {
        assert!(Cli::try_parse_from(["kiln", "build"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["kiln", "--minify"]).is_err());
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        assert!(Cli::try_parse_from(["kiln", "--verbose", "--quiet"]).is_err());
        assert!(Cli::try_parse_from(["kiln", "-q"]).unwrap().quiet);
    }
}
