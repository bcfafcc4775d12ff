//! Build-manifest resolution
//!
//! The function's source is addressed by a path to its `Cargo.toml`. The
//! actual packaging is `cargo lambda build`'s business; synthesis only
//! resolves the manifest far enough to name the binary target and predict
//! where the packaged artifact will land.
use crate::Error;

#[derive(Debug)]
pub struct CargoManifest {
    package_name: String,
    bin_name: String,
    manifest_path: std::path::PathBuf,
}

#[derive(serde::Deserialize)]
struct ManifestToml {
    package: Option<PackageToml>,
    #[serde(default)]
    bin: Vec<BinToml>,
}

#[derive(serde::Deserialize)]
struct PackageToml {
    name: String,
}

#[derive(serde::Deserialize)]
struct BinToml {
    name: Option<String>,
}

impl CargoManifest {
    pub fn from_path<P: AsRef<std::path::Path>>(manifest_path: P) -> Result<Self, Error> {
        use std::io::Read;

        let manifest_path = manifest_path.as_ref();
        if !manifest_path.is_file() {
            return Err(Error::ManifestNotFound(manifest_path.display().to_string()));
        }

        let mut f = std::fs::File::open(manifest_path)?;
        let mut toml_str = String::new();
        f.read_to_string(&mut toml_str)?;

        Self::from_toml_str(&toml_str, manifest_path)
    }

    pub fn from_toml_str(toml_str: &str, manifest_path: &std::path::Path) -> Result<Self, Error> {
        let manifest = toml::from_str::<ManifestToml>(toml_str)?;

        // Workspace-only manifests describe nothing buildable by themselves
        let package = manifest
            .package
            .ok_or_else(|| Error::NotAPackage(manifest_path.display().to_string()))?;

        // An explicit [[bin]] target wins, otherwise the binary is named
        // after the package
        let bin_name = manifest
            .bin
            .iter()
            .find_map(|bin| bin.name.clone())
            .unwrap_or_else(|| package.name.clone());

        Ok(Self {
            package_name: package.name,
            bin_name,
            manifest_path: manifest_path.to_path_buf(),
        })
    }

    pub fn package_name<'a>(&'a self) -> &'a str {
        self.package_name.as_str()
    }

    pub fn bin_name<'a>(&'a self) -> &'a str {
        self.bin_name.as_str()
    }

    pub fn manifest_path<'a>(&'a self) -> &'a std::path::Path {
        self.manifest_path.as_path()
    }

    /// Where `cargo lambda build --output-format zip` leaves the artifact,
    /// relative to the workspace target directory.
    pub fn artifact_path(&self) -> String {
        format!("target/lambda/{}/bootstrap.zip", self.bin_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<CargoManifest, Error> {
        CargoManifest::from_toml_str(toml_str, std::path::Path::new("Cargo.toml"))
    }

    #[test]
    fn bin_target_defaults_to_package_name() {
        let manifest = parse(
            r#"
            [package]
            name = "hello-world-api"
            version = "0.1.0"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.package_name(), "hello-world-api");
        assert_eq!(manifest.bin_name(), "hello-world-api");
        assert_eq!(
            manifest.artifact_path(),
            "target/lambda/hello-world-api/bootstrap.zip"
        );
    }

    #[test]
    fn explicit_bin_target_wins() {
        let manifest = parse(
            r#"
            [package]
            name = "my-api"

            [[bin]]
            name = "bootstrap"
            path = "src/bin/lambda.rs"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.bin_name(), "bootstrap");
    }

    #[test]
    fn workspace_manifest_is_rejected() {
        let err = parse(
            r#"
            [workspace]
            members = ["a", "b"]
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::NotAPackage(_)));
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let err = CargoManifest::from_path("no/such/Cargo.toml").unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound(_)));
    }
}
