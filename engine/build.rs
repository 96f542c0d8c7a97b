fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/projection.proto");
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["proto/projection.proto"], &["proto"])?;
    Ok(())
}
