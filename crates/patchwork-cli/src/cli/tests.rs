#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["patchwork", "build"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(!args.watch);
        assert!(!args.dev);
        assert!(!args.no_banner);
        assert_eq!(args.minify_override(), None);
        assert!(args.cwd.is_none());
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "patchwork",
            "build",
            "--watch",
            "--standalone",
            "--no-minify",
            "--cwd",
            "/project",
            "-d",
            "out",
        ])
        .unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(args.watch);
        assert!(args.standalone);
        assert_eq!(args.minify_override(), Some(false));
        assert_eq!(args.cwd, Some(PathBuf::from("/project")));
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_minify_flags_conflict() {
        let result = Cli::try_parse_from(["patchwork", "build", "--minify", "--no-minify"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["patchwork", "-v", "-q", "build"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["patchwork", "natives", "--no-color", "-v"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Natives(_)));
    }
}
