//! CLI argument parsing

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Fs(FsArgs),
    Log(LogArgs),
}

#[derive(Debug, Clone, Default)]
pub struct FsArgs {
    pub path: String,
    pub json: bool,
    pub max_depth: Option<u32>,
    pub min_size: u64,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub strategy_override: Option<String>,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct LogArgs {
    pub path: String,
    pub json: bool,
    pub format: String,
    pub regex: Option<String>,
    pub status_codes: Vec<u16>,
    pub errors_only: bool,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            path: String::new(),
            json: false,
            format: "auto".to_string(),
            regex: None,
            status_codes: Vec::new(),
            errors_only: false,
        }
    }
}

/// Parse command line arguments (`args[0]` is the program name)
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "fs" => Command::Fs(parse_fs_args(&args[2..])?),
        "log" => Command::Log(parse_log_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

/// Cursor over option arguments accepting both `--opt value` and `--opt=value`.
struct OptionCursor<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> OptionCursor<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }

    /// Next argument split into `(flag, inline value)`.
    fn next_arg(&mut self) -> Option<(&'a str, Option<&'a str>)> {
        let arg = self.args.get(self.pos)?.as_str();
        self.pos += 1;

        if arg.starts_with("--")
            && let Some((flag, value)) = arg.split_once('=')
        {
            return Some((flag, Some(value)));
        }
        Some((arg, None))
    }

    fn value_for(&mut self, flag: &str, inline: Option<&'a str>) -> Result<&'a str, String> {
        if let Some(value) = inline {
            return Ok(value);
        }

        let value = self
            .args
            .get(self.pos)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        self.pos += 1;
        Ok(value.as_str())
    }
}

fn reject_inline(flag: &str, inline: Option<&str>) -> Result<(), String> {
    match inline {
        Some(_) => Err(format!("{flag} does not take a value")),
        None => Ok(()),
    }
}

fn set_path(path: &mut String, arg: &str) -> Result<(), String> {
    if path.is_empty() {
        *path = arg.to_string();
        Ok(())
    } else {
        Err(format!("Unexpected argument: {arg}"))
    }
}

/// `-1` means unlimited.
fn parse_depth(value: &str) -> Result<Option<u32>, String> {
    let depth: i64 = value
        .parse()
        .map_err(|_| "--depth must be a number".to_string())?;

    match depth {
        -1 => Ok(None),
        d if d < 0 => Err("--depth must be -1 (unlimited) or a non-negative number".to_string()),
        d => u32::try_from(d)
            .map(Some)
            .map_err(|_| "--depth is too large".to_string()),
    }
}

fn parse_status_list(value: &str) -> Result<Vec<u16>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u16>()
                .map_err(|_| format!("Invalid status code: {s}"))
        })
        .collect()
}

fn parse_fs_args(args: &[String]) -> Result<FsArgs, String> {
    let mut fs_args = FsArgs::default();
    let mut cursor = OptionCursor::new(args);

    while let Some((flag, inline)) = cursor.next_arg() {
        match flag {
            "--json" => {
                reject_inline(flag, inline)?;
                fs_args.json = true;
            }
            "--depth" | "--max-depth" => {
                fs_args.max_depth = parse_depth(cursor.value_for(flag, inline)?)?;
            }
            "--min-size" => {
                fs_args.min_size = cursor
                    .value_for(flag, inline)?
                    .parse()
                    .map_err(|_| "--min-size must be a number of bytes".to_string())?;
            }
            "--include" => {
                fs_args.include.push(cursor.value_for(flag, inline)?.to_string());
            }
            "--exclude" => {
                fs_args.exclude.push(cursor.value_for(flag, inline)?.to_string());
            }
            "--hidden" => {
                reject_inline(flag, inline)?;
                fs_args.include_hidden = true;
            }
            "--follow-symlinks" => {
                reject_inline(flag, inline)?;
                fs_args.follow_symlinks = true;
            }
            "--strategy" => {
                fs_args.strategy_override = Some(cursor.value_for(flag, inline)?.to_string());
            }
            "--quiet" => {
                reject_inline(flag, inline)?;
                fs_args.quiet = true;
            }
            arg if !arg.starts_with("--") => set_path(&mut fs_args.path, arg)?,
            _ => return Err(format!("Unknown option: {flag}")),
        }
    }

    if fs_args.path.is_empty() {
        return Err("Missing required argument: DIR".to_string());
    }

    Ok(fs_args)
}

fn parse_log_args(args: &[String]) -> Result<LogArgs, String> {
    let mut log_args = LogArgs::default();
    let mut cursor = OptionCursor::new(args);

    while let Some((flag, inline)) = cursor.next_arg() {
        match flag {
            "--json" => {
                reject_inline(flag, inline)?;
                log_args.json = true;
            }
            "--format" => {
                log_args.format = cursor.value_for(flag, inline)?.to_string();
            }
            "--regex" => {
                log_args.regex = Some(cursor.value_for(flag, inline)?.to_string());
            }
            "--status" => {
                let codes = parse_status_list(cursor.value_for(flag, inline)?)?;
                log_args.status_codes.extend(codes);
            }
            "--errors-only" => {
                reject_inline(flag, inline)?;
                log_args.errors_only = true;
            }
            arg if !arg.starts_with("--") => set_path(&mut log_args.path, arg)?,
            _ => return Err(format!("Unknown option: {flag}")),
        }
    }

    if log_args.path.is_empty() {
        return Err("Missing required argument: FILE".to_string());
    }

    Ok(log_args)
}
