//! Integration tests for gradle-pin

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn gradle_pin() -> Command {
        cargo_bin_cmd!("gradle-pin")
    }

    #[test]
    fn help_displays() {
        gradle_pin()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--exclude-deps"))
            .stdout(predicate::str::contains("--ensure-only"));
    }

    #[test]
    fn missing_flag_value_is_usage_error() {
        gradle_pin()
            .args(["build", "--repo-root"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--repo-root"));
    }
}

#[cfg(unix)]
mod mirror_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use predicates::prelude::*;
    use sha1::{Digest, Sha1};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const FAKE_GRADLE: &str = "#!/bin/sh\n\
        echo \"args: $*\"\n\
        echo \"java: $JAVA_HOME\"\n\
        echo \"opts: $GRADLE_OPTS\"\n\
        echo \"cwd: $(pwd -P)\"\n\
        test -d \"$JAVA_HOME\" && echo \"java home present\"\n\
        exit 7\n";

    fn jdk_dir() -> &'static str {
        if cfg!(target_os = "macos") {
            "osx"
        } else {
            "linux"
        }
    }

    fn tar_gz(entries: &[(String, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// A repository checkout with committed `.sha1` files and a mirror
    /// directory holding the matching objects.
    struct Checkout {
        repo: TempDir,
        mirror: TempDir,
        home: TempDir,
    }

    impl Checkout {
        fn new() -> Self {
            Self::with_jdks("jdk-21", &["jdk-21"])
        }

        fn with_jdks(default: &str, variants: &[&str]) -> Self {
            let checkout = Self {
                repo: TempDir::new().unwrap(),
                mirror: TempDir::new().unwrap(),
                home: TempDir::new().unwrap(),
            };

            let listed: Vec<String> = variants.iter().map(|v| format!("\"{}\"", v)).collect();
            fs::write(
                checkout.repo.path().join(".gradle-pin.toml"),
                format!(
                    "[general]\nfetch_journal = false\n\n\
                     [store]\nurl = \"file://{}\"\n\n\
                     [jdk]\ndefault = \"{}\"\nvariants = [{}]\n",
                    checkout.mirror.path().display(),
                    default,
                    listed.join(", ")
                ),
            )
            .unwrap();

            let third_party = checkout.third_party();
            checkout.publish(
                &third_party.join("gradle.tar.gz"),
                &[("gradle/bin/gradle".to_string(), FAKE_GRADLE.as_bytes())],
            );

            let mut jdks = variants.to_vec();
            if !jdks.contains(&default) {
                jdks.push(default);
            }
            for jdk in jdks {
                checkout.publish(
                    &third_party
                        .join("openjdk")
                        .join(jdk)
                        .join(format!("{}.tar.gz", jdk_dir())),
                    &[(format!("{}/release", jdk_dir()), jdk.as_bytes())],
                );
            }

            checkout.publish(
                &third_party.join("protoc.tar.gz"),
                &[("protoc/bin/protoc".to_string(), &b"#!/bin/sh\n"[..])],
            );
            checkout
        }

        fn third_party(&self) -> PathBuf {
            self.repo.path().join("third_party")
        }

        /// Commit the checksum of an archive and upload the archive
        fn publish(&self, archive: &Path, entries: &[(String, &[u8])]) {
            let bytes = tar_gz(entries);
            let digest = hex::encode(Sha1::digest(&bytes));

            fs::create_dir_all(archive.parent().unwrap()).unwrap();
            fs::write(format!("{}.sha1", archive.display()), format!("{}\n", digest)).unwrap();
            fs::write(self.mirror.path().join(&digest), bytes).unwrap();
        }

        fn unpublish(&self, archive: &Path) {
            let digest = fs::read_to_string(format!("{}.sha1", archive.display())).unwrap();
            fs::remove_file(self.mirror.path().join(digest.trim())).unwrap();
        }

        fn command(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("gradle-pin");
            cmd.current_dir(self.repo.path())
                .env("GRADLE_PIN_CONFIG", self.home.path().join("config.toml"))
                .env_remove("GRADLE_PIN_REPO_ROOT")
                .env("CI", "true");
            cmd
        }
    }

    #[test]
    fn ensure_only_materializes_everything() {
        let checkout = Checkout::new();

        checkout
            .command()
            .arg("--ensure-only")
            .assert()
            .success()
            .stderr(predicate::str::contains("Gradle binary"))
            .stderr(predicate::str::contains("Proto Compiler"));

        let third_party = checkout.third_party();
        assert!(third_party.join("gradle/bin/gradle").is_file());
        assert!(third_party
            .join("openjdk/jdk-21")
            .join(jdk_dir())
            .join("release")
            .is_file());
        assert!(third_party.join("protoc/bin/protoc").is_file());
    }

    #[test]
    fn present_dependencies_need_no_mirror() {
        let checkout = Checkout::new();
        checkout.command().arg("--ensure-only").assert().success();

        fs::remove_dir_all(checkout.mirror.path()).unwrap();

        checkout.command().arg("--ensure-only").assert().success();
    }

    #[test]
    fn missing_object_fails_with_label() {
        let checkout = Checkout::new();
        checkout.unpublish(&checkout.third_party().join("protoc.tar.gz"));

        checkout
            .command()
            .arg("--ensure-only")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("Proto Compiler"))
            .stderr(predicate::str::contains("Hint:"));

        // Earlier dependencies stay materialized
        assert!(checkout.third_party().join("gradle/bin/gradle").is_file());
        assert!(!checkout.third_party().join("protoc").exists());
    }

    #[test]
    fn forwards_to_gradle_and_returns_its_exit_code() {
        let checkout = Checkout::new();
        let repo = checkout.repo.path().canonicalize().unwrap();

        checkout
            .command()
            .args(["build", "--exclude-deps", "-x", "test"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains(
                "args: build -x test -Pexclude_deps --offline -c=d8_r8/settings.gradle.kts",
            ))
            .stdout(predicate::str::contains("openjdk/jdk-21"))
            .stdout(predicate::str::contains("java home present"))
            .stdout(predicate::str::contains("opts: -Xmx1g"))
            .stdout(predicate::str::contains(format!("cwd: {}", repo.display())))
            .stderr(predicate::str::contains("Running:"));
    }

    #[test]
    fn worktree_uses_repo_user_home() {
        let checkout = Checkout::new();
        let repo = checkout.repo.path().canonicalize().unwrap();
        let user_home = repo.join(".gradle_user_home");

        checkout
            .command()
            .args(["--worktree", "--", "--no-internal"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains(format!(
                "args: --no-internal -g={} --offline",
                user_home.display()
            )));
    }

    #[test]
    fn relative_repo_root_from_parent_directory() {
        let checkout = Checkout::new();
        let parent = checkout.repo.path().parent().unwrap();
        let name = checkout.repo.path().file_name().unwrap();

        checkout
            .command()
            .current_dir(parent)
            .arg("--repo-root")
            .arg(name)
            .arg("build")
            .assert()
            .code(7)
            .stdout(predicate::str::contains("args: build --offline"))
            .stdout(predicate::str::contains("java home present"));

        assert!(checkout.third_party().join("gradle/bin/gradle").is_file());
    }

    #[test]
    fn default_jdk_outside_variants_is_fetched() {
        let checkout = Checkout::with_jdks("jdk-17", &["jdk-21"]);

        checkout
            .command()
            .arg("build")
            .assert()
            .code(7)
            .stdout(predicate::str::contains("openjdk/jdk-17"))
            .stdout(predicate::str::contains("java home present"));

        assert!(checkout
            .third_party()
            .join("openjdk/jdk-21")
            .join(jdk_dir())
            .is_dir());
    }

    #[test]
    fn gradle_version_flags_are_forwarded() {
        let checkout = Checkout::new();

        checkout
            .command()
            .args(["-v", "-V", "--version"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains("args: -v -V --version --offline"));
    }
}
