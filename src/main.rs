use std::path::PathBuf ;
use std::process::ExitCode ;

use clap::Parser ;
use tracing_subscriber::EnvFilter ;

use layer_link::{ BootConfig, LaunchDispatcher, ProviderRegistry };

/// Boot a layered component application and dispatch to a launch target.
#[derive( Parser, Debug )]
#[command( name = "layer-link", version, about )]
struct Args {
    /// Id of the launch target to dispatch to; overrides Launch-Target from
    /// the boot configuration.
    #[arg( long = "launchTarget" )]
    launch_target: Option<String>,
    /// Path to the boot configuration file.
    #[arg( long, default_value = "boot.cfg" )]
    config: PathBuf,
    /// Arguments passed through unchanged to the launch target.
    #[arg( trailing_var_arg = true, allow_hyphen_values = true )]
    args: Vec<String>,
}

fn main() -> ExitCode {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(| _ | EnvFilter::new( "layer_link=info" ))
        )
        .with_writer( std::io::stderr )
        .init();

    let args = Args::parse();

    let config = match BootConfig::read_from( &args.config ) {
        Ok( config ) => config,
        Err( err ) => {
            tracing::error!( "{}", err );
            return ExitCode::FAILURE
        }
    };

    let mut dispatcher = LaunchDispatcher::new( ProviderRegistry::new() );
    match dispatcher.dispatch( &config, args.launch_target.as_deref(), &args.args ) {
        Ok(()) => ExitCode::SUCCESS,
        Err( err ) => {
            tracing::error!( "{}", err );
            ExitCode::FAILURE
        }
    }

}
