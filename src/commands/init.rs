use crate::cli::InitArgs;
use crate::config::generate_config_template;
use crate::fs::{FileSystem, default_fs};
use crate::style;

pub fn cmd_init(args: InitArgs) -> i32 {
    cmd_init_with_fs(args, default_fs())
}

pub fn cmd_init_with_fs(args: InitArgs, fs: &dyn FileSystem) -> i32 {
    let config_path = args.path.join(".bundlemap.toml");
    if fs.exists(&config_path) {
        style::error(&format!(
            ".bundlemap.toml already exists at {}",
            style::path(&config_path)
        ));
        return 1;
    }

    let template = generate_config_template();
    if let Err(e) = fs.write(&config_path, &template) {
        style::error(&format!("Failed to write config file: {}", e));
        return 1;
    }

    style::success(&format!(
        "Created .bundlemap.toml at {}",
        style::path(&config_path)
    ));
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    #[test]
    fn init_writes_a_parseable_template() {
        let fs = MockFs::new();
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/project"),
            },
            &fs,
        );

        assert_eq!(code, 0);
        let content = fs
            .read_to_string(Path::new("/project/.bundlemap.toml"))
            .unwrap();
        assert!(Config::from_toml(&content).is_ok());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let fs = MockFs::with_files([("/project/.bundlemap.toml", "tension = 0.1")]);
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/project"),
            },
            &fs,
        );
        assert_eq!(code, 1);
    }
}
