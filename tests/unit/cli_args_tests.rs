//! Unit tests for CLI argument parsing
#[cfg(test)]
mod tests {
	use filestat::cli::args::{Command, FsArgs, LogArgs, parse_args};

	fn make_args(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|s| s.to_string()).collect()
	}

	fn parse_fs(raw: &[&str]) -> FsArgs {
		let parsed = parse_args(&make_args(raw)).expect("parse fs args");
		let Command::Fs(fs) = parsed.command else {
			panic!("expected fs command");
		};
		fs
	}

	fn parse_log(raw: &[&str]) -> LogArgs {
		let parsed = parse_args(&make_args(raw)).expect("parse log args");
		let Command::Log(log) = parsed.command else {
			panic!("expected log command");
		};
		log
	}

	#[test]
	fn fs_defaults() {
		let fs = parse_fs(&["filestat", "fs", "/tmp/work"]);

		assert_eq!(fs.path, "/tmp/work");
		assert!(!fs.json);
		assert!(fs.max_depth.is_none());
		assert_eq!(fs.min_size, 0);
		assert!(!fs.include_hidden);
		assert!(!fs.follow_symlinks);
		assert!(fs.strategy_override.is_none());
	}

	#[test]
	fn fs_accepts_both_value_forms() {
		let fs = parse_fs(&[
			"filestat",
			"fs",
			"/data",
			"--depth",
			"3",
			"--min-size=1000",
			"--include",
			"*.rs",
			"--include=*.toml",
			"--exclude",
			"target",
			"--hidden",
			"--follow-symlinks",
			"--strategy=legacy",
			"--json",
			"--quiet",
		]);

		assert_eq!(fs.max_depth, Some(3));
		assert_eq!(fs.min_size, 1000);
		assert_eq!(fs.include, vec!["*.rs", "*.toml"]);
		assert_eq!(fs.exclude, vec!["target"]);
		assert!(fs.include_hidden);
		assert!(fs.follow_symlinks);
		assert_eq!(fs.strategy_override.as_deref(), Some("legacy"));
		assert!(fs.json);
		assert!(fs.quiet);
	}

	#[test]
	fn depth_minus_one_is_unlimited() {
		let fs = parse_fs(&["filestat", "fs", "/data", "--depth", "-1"]);
		assert!(fs.max_depth.is_none());

		let err = parse_args(&make_args(&["filestat", "fs", "/data", "--depth", "-2"]))
			.expect_err("negative depth other than -1 should fail");
		assert!(err.contains("--depth"));
	}

	#[test]
	fn option_requires_value() {
		let err = parse_args(&make_args(&["filestat", "fs", "/tmp/work", "--strategy"]))
			.expect_err("strategy flag without value should fail");
		assert!(err.contains("--strategy requires a value"));
	}

	#[test]
	fn switch_rejects_inline_value() {
		let err = parse_args(&make_args(&["filestat", "fs", "/tmp", "--json=yes"]))
			.expect_err("switch with value should fail");
		assert!(err.contains("does not take a value"));
	}

	#[test]
	fn unknown_command_and_option_fail() {
		assert!(parse_args(&make_args(&["filestat", "scan", "/tmp"])).is_err());
		assert!(parse_args(&make_args(&["filestat", "fs", "/tmp", "--bogus"])).is_err());
		assert!(parse_args(&make_args(&["filestat"])).is_err());
	}

	#[test]
	fn missing_path_fails() {
		let err = parse_args(&make_args(&["filestat", "log", "--json"]))
			.expect_err("missing file should fail");
		assert!(err.contains("FILE"));

		let err = parse_args(&make_args(&["filestat", "fs", "a", "b"]))
			.expect_err("two paths should fail");
		assert!(err.contains("Unexpected argument"));
	}

	#[test]
	fn log_options() {
		let log = parse_log(&[
			"filestat",
			"log",
			"access.log",
			"--format",
			"combined",
			"--regex=timeout|refused",
			"--status",
			"404, 500",
			"--status=503",
			"--errors-only",
		]);

		assert_eq!(log.path, "access.log");
		assert_eq!(log.format, "combined");
		assert_eq!(log.regex.as_deref(), Some("timeout|refused"));
		assert_eq!(log.status_codes, vec![404, 500, 503]);
		assert!(log.errors_only);
	}

	#[test]
	fn log_defaults_to_auto_format() {
		let log = parse_log(&["filestat", "log", "access.log"]);
		assert_eq!(log.format, "auto");
		assert!(log.status_codes.is_empty());

		let err = parse_args(&make_args(&["filestat", "log", "a.log", "--status", "abc"]))
			.expect_err("bad status should fail");
		assert!(err.contains("Invalid status code"));
	}
}
