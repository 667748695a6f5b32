use framefit::viewer::SETTINGS_PATH;
use framefit::viewer::app;
use framefit::viewer::settings::load_settings_or_default;
use std::env;
use std::path::PathBuf;

#[derive(Debug)]
struct CliOptions {
    settings_path: PathBuf,
    model_path: Option<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(SETTINGS_PATH),
            model_path: None,
        }
    }
}

fn main() {
    let options = parse_cli_options();

    // The log subscriber only exists once the app is built, so report on stderr.
    let mut settings = load_settings_or_default(&options.settings_path);
    if let Some(path) = options.model_path {
        settings = settings.with_model(path);
    }

    app::run(settings);
}

fn parse_cli_options() -> CliOptions {
    let mut options = CliOptions::default();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" | "-m" => {
                let Some(value) = args.next() else {
                    eprintln!("--model expects a path to a .glb/.gltf file");
                    print_cli_help_and_exit(2);
                };
                options.model_path = Some(value);
            }
            "--config" | "-c" => {
                let Some(value) = args.next() else {
                    eprintln!("--config expects a path");
                    print_cli_help_and_exit(2);
                };
                options.settings_path = PathBuf::from(value);
            }
            "--help" | "-h" => {
                print_cli_help_and_exit(0);
            }
            _ => {
                eprintln!("Unknown option: {arg}");
                print_cli_help_and_exit(2);
            }
        }
    }

    options
}

fn print_cli_help_and_exit(code: i32) -> ! {
    println!(
        "Usage:\n  framefit [options]\n\nOptions:\n  -m, --model <path>    View a glTF/GLB model (path relative to assets/)\n  -c, --config <path>   Viewer settings file (default: {SETTINGS_PATH})\n  -h, --help            Show this help"
    );
    std::process::exit(code);
}
