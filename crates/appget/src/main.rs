//! appget - command-line application installer

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let exit_code = appget::run_process(args).await;
    std::process::exit(exit_code);
}
