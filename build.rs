fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .compile_protos(
            &[
                "proto/authzed/api/v1/core.proto",
                "proto/authzed/api/v1/permission_service.proto",
                "proto/authzed/api/materialize/v0/watchpermissionsets.proto",
            ],
            &["proto"],
        )
        .unwrap_or_else(|e| panic!("protobuf compile error: {e}"));

    Ok(())
}
