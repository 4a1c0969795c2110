fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile SSO auth service proto
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/sso.proto"], &["proto/"])?;

    Ok(())
}
