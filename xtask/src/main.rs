// Build automation tool - suppress style lints
#![allow(clippy::needless_borrow)]

use serde::Deserialize;
use sha2::{Digest, Sha256};
use shell_escape::escape;
use std::borrow::Cow;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const KERNEL_TARGET: &str = "aarch64-unknown-none";
const KERNEL_BIN: &str = "virtos";
const QEMU: &str = "qemu-system-aarch64";
const CONFIG_FILE: &str = ".virtos_qemu.toml";

fn run(cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("[RUN] {:?}", cmd);
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("command failed: {:?}", cmd);
    }
    Ok(())
}

fn cargo() -> Command {
    Command::new(env::var("CARGO").unwrap_or_else(|_| "cargo".into()))
}

fn rustup() -> Command {
    Command::new("rustup")
}

fn root() -> anyhow::Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(p) => Ok(p.to_path_buf()),
        None => anyhow::bail!("xtask manifest has no parent directory"),
    }
}

fn dist_dir() -> anyhow::Result<PathBuf> {
    let dist = root()?.join("build/dist");
    fs::create_dir_all(&dist)?;
    Ok(dist)
}

fn have(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

fn task_fmt() -> anyhow::Result<()> {
    run(cargo().args(["fmt", "--all"]))
}

fn task_fmt_check() -> anyhow::Result<()> {
    run(cargo().args(["fmt", "--all", "--", "--check"]))
}

fn task_clippy() -> anyhow::Result<()> {
    run(cargo().args([
        "clippy",
        "--workspace",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]))
}

fn task_test() -> anyhow::Result<()> {
    run(cargo().args(["test", "-p", "virtos", "--lib"]))?;
    run(cargo().args(["test", "-p", "virtos", "--lib", "--all-features"]))?;
    run(cargo().args(["test", "-p", "xtask"]))
}

fn task_check() -> anyhow::Result<()> {
    task_fmt_check()?;
    task_clippy()?;
    task_test()
}

fn task_preview() -> anyhow::Result<()> {
    run(cargo().args(["run", "-p", "virtos", "--bin", KERNEL_BIN]))
}

/// Options for `kernel`
#[derive(Debug, Default, PartialEq, Eq)]
struct KernelOpts {
    debug: bool,
    features: Vec<String>,
}

fn parse_kernel_opts(args: &[String]) -> anyhow::Result<KernelOpts> {
    let mut k = KernelOpts::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--debug" => {
                k.debug = true;
                i += 1;
            }
            "--features" if i + 1 < args.len() => {
                k.features
                    .extend(args[i + 1].split(',').filter(|f| !f.is_empty()).map(String::from));
                i += 2;
            }
            other => anyhow::bail!("unknown kernel option: {}", other),
        }
    }
    Ok(k)
}

fn find_objcopy() -> Option<&'static str> {
    [
        "llvm-objcopy",
        "rust-objcopy",
        "aarch64-linux-gnu-objcopy",
        "aarch64-elf-objcopy",
    ]
    .into_iter()
    .find(|c| have(c))
}

fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let data = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn tool_version(cmd: &str) -> Option<String> {
    let out = Command::new(cmd).arg("--version").output().ok()?;
    let first_line = |bytes: &[u8]| {
        String::from_utf8_lossy(bytes)
            .lines()
            .next()
            .unwrap_or("")
            .to_string()
    };
    let mut s = first_line(&out.stdout);
    if s.is_empty() {
        s = first_line(&out.stderr);
    }
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Build the kernel, returning the ELF and raw image in `build/dist`
fn build_kernel(opts: &KernelOpts) -> anyhow::Result<(PathBuf, PathBuf)> {
    let dist = dist_dir()?;
    let profile = if opts.debug { "debug" } else { "release" };

    eprintln!("[BUILD] {} kernel ({})...", KERNEL_TARGET, profile);
    let mut cmd = cargo();
    cmd.args(["build", "-p", "virtos", "--bin", KERNEL_BIN, "--target", KERNEL_TARGET]);
    if !opts.debug {
        cmd.arg("--release");
    }
    if !opts.features.is_empty() {
        cmd.args(["--features", &opts.features.join(",")]);
    }
    run(&mut cmd)?;

    let built = root()?.join(format!("target/{}/{}/{}", KERNEL_TARGET, profile, KERNEL_BIN));
    let out_elf = dist.join(format!("{}.elf", KERNEL_BIN));
    let out_bin = dist.join(format!("{}.bin", KERNEL_BIN));
    fs::copy(&built, &out_elf)?;

    match find_objcopy() {
        Some(objcopy) => {
            eprintln!("[OBJCOPY] {} -> {}", objcopy, out_bin.display());
            run(Command::new(objcopy)
                .args(["-O", "binary"])
                .arg(&out_elf)
                .arg(&out_bin))?;
        }
        None => anyhow::bail!("no objcopy found; install llvm-tools (`rustup component add llvm-tools`)"),
    }

    eprintln!("[SIZE] {}: {} bytes", out_elf.display(), out_elf.metadata()?.len());
    eprintln!("[SIZE] {}: {} bytes", out_bin.display(), out_bin.metadata()?.len());
    Ok((out_elf, out_bin))
}

fn write_checksums(dist: &Path, artifacts: &[PathBuf]) -> anyhow::Result<()> {
    let mut sums = String::new();
    for path in artifacts {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        sums.push_str(&format!("{}  {}\n", sha256_file(path)?, name));
    }
    let out = dist.join("SHA256SUMS");
    fs::write(&out, sums)?;
    eprintln!("[ARTIFACT] {}", out.display());
    Ok(())
}

fn write_manifest(dist: &Path, opts: &KernelOpts, artifacts: &[PathBuf]) -> anyhow::Result<()> {
    let mut list = Vec::new();
    for path in artifacts {
        list.push(serde_json::json!({
            "name": path.file_name().map(|n| n.to_string_lossy()),
            "path": path.to_string_lossy(),
            "bytes": path.metadata()?.len(),
            "sha256": sha256_file(path)?,
        }));
    }
    let profile = if opts.debug { "debug" } else { "release" };
    let manifest = serde_json::json!({
        "kernel": {
            "target": KERNEL_TARGET,
            "profile": profile,
            "features": opts.features,
        },
        "versions": {
            "rustc": tool_version("rustc"),
            "cargo": tool_version("cargo"),
            "qemu-system-aarch64": tool_version(QEMU),
            "objcopy": find_objcopy(),
        },
        "artifacts": list,
        "meta": {
            "timestamp": std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs()),
            "xtask_version": env!("CARGO_PKG_VERSION"),
        }
    });
    let out = dist.join("MANIFEST.json");
    fs::write(&out, serde_json::to_vec_pretty(&manifest)?)?;
    eprintln!("[ARTIFACT] {}", out.display());
    Ok(())
}

fn task_kernel(args: &[String]) -> anyhow::Result<()> {
    let opts = parse_kernel_opts(args)?;
    let (elf, bin) = build_kernel(&opts)?;
    let dist = dist_dir()?;
    let artifacts = [elf, bin];
    write_checksums(&dist, &artifacts)?;
    write_manifest(&dist, &opts, &artifacts)
}

/// `~/.virtos_qemu.toml`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
struct QemuConfig {
    cpu: Option<String>,
    mem: Option<String>,
    extra: Vec<String>,
}

fn read_qemu_config() -> anyhow::Result<QemuConfig> {
    let Ok(home) = env::var("HOME") else {
        return Ok(QemuConfig::default());
    };
    let path = PathBuf::from(home).join(CONFIG_FILE);
    if !path.exists() {
        return Ok(QemuConfig::default());
    }
    let s = fs::read_to_string(&path)?;
    toml::from_str(&s).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

#[derive(Debug, PartialEq, Eq)]
struct QemuOpts {
    kernel: Option<PathBuf>,
    cpu: String,
    mem: String,
    gdb: bool,
    debug_flags: Option<String>,
    logfile: Option<PathBuf>,
    extra: Vec<String>,
}

impl QemuOpts {
    fn from_config(config: QemuConfig) -> Self {
        QemuOpts {
            kernel: None,
            cpu: config.cpu.unwrap_or_else(|| "cortex-a72".into()),
            mem: config.mem.unwrap_or_else(|| "128M".into()),
            gdb: false,
            debug_flags: None,
            logfile: None,
            extra: config.extra,
        }
    }
}

fn parse_qemu_opts(args: &[String], config: QemuConfig) -> anyhow::Result<QemuOpts> {
    let mut q = QemuOpts::from_config(config);
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("--kernel", Some(v)) => {
                q.kernel = Some(PathBuf::from(v));
                i += 2;
            }
            ("--cpu", Some(v)) => {
                q.cpu = v;
                i += 2;
            }
            ("--mem", Some(v)) => {
                q.mem = v;
                i += 2;
            }
            ("--debug-flags", Some(v)) => {
                q.debug_flags = Some(v);
                i += 2;
            }
            ("--logfile", Some(v)) => {
                q.logfile = Some(PathBuf::from(v));
                i += 2;
            }
            ("--gdb", _) => {
                q.gdb = true;
                i += 1;
            }
            ("--", _) => {
                q.extra.extend_from_slice(&args[i + 1..]);
                break;
            }
            (other, _) if other.starts_with("--") => {
                anyhow::bail!("unknown or incomplete qemu option: {}", other)
            }
            // A bare path is the kernel image
            (path, _) => {
                q.kernel = Some(PathBuf::from(path));
                i += 1;
            }
        }
    }
    Ok(q)
}

fn qemu_args(q: &QemuOpts, kernel: &Path) -> Vec<String> {
    let mut a: Vec<String> = vec![
        "-M".into(),
        "virt".into(),
        "-cpu".into(),
        q.cpu.clone(),
        "-m".into(),
        q.mem.clone(),
        "-nographic".into(),
        "-kernel".into(),
        kernel.to_string_lossy().into_owned(),
    ];
    if q.gdb {
        a.extend(["-s".into(), "-S".into()]);
    }
    if let Some(flags) = &q.debug_flags {
        a.extend(["-d".into(), flags.clone()]);
    }
    if let Some(log) = &q.logfile {
        a.extend(["-D".into(), log.to_string_lossy().into_owned()]);
    }
    a.extend(q.extra.iter().cloned());
    a
}

fn shell_line(program: &str, args: &[String]) -> String {
    let mut line = escape(Cow::Borrowed(program)).into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&escape(Cow::Borrowed(arg.as_str())));
    }
    line
}

fn task_qemu(args: &[String]) -> anyhow::Result<()> {
    let opts = parse_qemu_opts(args, read_qemu_config()?)?;

    let kernel = match &opts.kernel {
        Some(k) => k.clone(),
        None => {
            let elf = dist_dir()?.join(format!("{}.elf", KERNEL_BIN));
            if !elf.exists() {
                eprintln!("[INFO] {} not found, building...", elf.display());
                task_kernel(&[])?;
            }
            elf
        }
    };
    if !kernel.exists() {
        anyhow::bail!("kernel image {} does not exist", kernel.display());
    }
    if !have(QEMU) {
        anyhow::bail!("{} not available. Install QEMU for ARM systems.", QEMU);
    }

    let qargs = qemu_args(&opts, &kernel);
    eprintln!("[QEMU] {}", shell_line(QEMU, &qargs));
    if opts.gdb {
        eprintln!("[QEMU] waiting for gdb on localhost:1234 (Ctrl-A X to quit)");
    } else {
        eprintln!("[QEMU] Ctrl-A X to quit");
    }
    run(Command::new(QEMU).args(&qargs))
}

fn task_env_check() -> anyhow::Result<()> {
    eprintln!("[INFO] Checking rustup components...");
    for component in ["rust-src", "rustfmt", "clippy", "llvm-tools"] {
        run(rustup()
            .args(["component", "add", component])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null()))?;
    }
    run(rustup()
        .args(["target", "add", KERNEL_TARGET])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null()))?;
    eprintln!("[INFO] Rustup components and target checked/installed.");

    let mut missing = Vec::new();
    if !have(QEMU) {
        missing.push(QEMU);
        eprintln!("[WARN] {} not found. Install QEMU for ARM systems.", QEMU);
        eprintln!("[INFO] On macOS: `brew install qemu`");
        eprintln!("[INFO] On Ubuntu/Debian: `sudo apt install qemu-system-arm`");
    }
    if find_objcopy().is_none() {
        missing.push("objcopy");
        eprintln!("[WARN] no aarch64-capable objcopy found; `rustup component add llvm-tools`");
    }

    for tool in ["rustc", "cargo", QEMU] {
        match tool_version(tool) {
            Some(v) => eprintln!("[VER] {}: {}", tool, v),
            None => eprintln!("[VER] {}: not found", tool),
        }
    }

    if missing.is_empty() {
        eprintln!("[INFO] Environment ready.");
        Ok(())
    } else {
        anyhow::bail!("missing tools: {}", missing.join(", "))
    }
}

fn task_clean() -> anyhow::Result<()> {
    eprintln!("[CLEAN] Cleaning build artifacts...");
    run(cargo().args(["clean"]))?;
    let build_dir = root()?.join("build");
    if build_dir.exists() {
        fs::remove_dir_all(&build_dir)?;
        eprintln!("[CLEAN] Removed {}", build_dir.display());
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "xtask commands:\n  fmt | fmt-check | clippy | test | check | env-check | clean\n  kernel [--debug] [--features <list>]   # build build/dist/virtos.{{elf,bin}}\n  qemu [options] [-- <extra qemu args>]   # boot the kernel on QEMU virt\n  preview                                 # host build of the boot report\n\nQEMU options: --kernel <elf> | --cpu <name> | --mem <size> | --gdb | --debug-flags <flags> | --logfile <file>\nDefaults come from ~/{} (cpu, mem, extra).\n\nExamples:\n  cargo xtask kernel --features debug-log\n  cargo xtask qemu --mem 256M -- -d guest_errors\n  cargo run --target {} --features debug-log",
        CONFIG_FILE, KERNEL_TARGET
    );
}

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "help".into());
    let rest: Vec<String> = args.collect();
    match cmd.as_str() {
        "fmt" => task_fmt(),
        "fmt-check" => task_fmt_check(),
        "clippy" => task_clippy(),
        "test" => task_test(),
        "check" => task_check(),
        "kernel" => task_kernel(&rest),
        "qemu" => task_qemu(&rest),
        "preview" => task_preview(),
        "env-check" => task_env_check(),
        "clean" => task_clean(),
        _ => {
            print_help();
            Ok(())
        }
    }
}
