use std::ffi::OsString;
use std::process::Command;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use clonable_command::Command as ClonableCommand;
use command_error::CommandExt;
use command_error::OutputContext;
use fs_err as fs;
use git_depgraph::Git;
use git_depgraph::Utf8TempDir;
use itertools::Itertools;
use miette::miette;
use miette::Context;
use miette::IntoDiagnostic;
use utf8_command::Utf8Output;

/// The image path `git-depgraph` writes to by default, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "commit_dependency_graph.png";

/// `git-depgraph` session for integration testing.
///
/// Commands run in a temporary directory with an isolated Git configuration. `--no-open` is always
/// passed so no image viewer is launched.
pub struct GitDepgraph {
    command: ClonableCommand,
    tempdir: Utf8TempDir,
    git_depgraph: OsString,
    git_depgraph_args: Vec<String>,
}

impl GitDepgraph {
    pub fn new() -> miette::Result<Self> {
        let tempdir = Utf8TempDir::new()?;

        let gitconfig = tempdir.join(".gitconfig");
        fs::write(
            &gitconfig,
            "[user]\n\
            name = Puppy Doggy\n\
            email = dog@becca.ooo\n\
            \n\
            [init]\n\
            defaultBranch = main\n\
            ",
        )
        .into_diagnostic()?;

        let git_depgraph = test_bin::get_test_bin("git-depgraph")
            .get_program()
            .to_owned();

        let log_filters = ["debug", "git_depgraph=trace"].into_iter().join(",");

        let git_depgraph_args = vec!["--log".to_owned(), log_filters, "--no-open".to_owned()];

        let command = ClonableCommand::new("")
            .envs([
                // > Whether to skip reading settings from the system-wide $(prefix)/etc/gitconfig file.
                ("GIT_CONFIG_NOSYSTEM", "1"),
                ("GIT_CONFIG_GLOBAL", gitconfig.as_str()),
                ("GIT_CEILING_DIRECTORIES", tempdir.as_str()),
                ("GIT_AUTHOR_DATE", "2019-07-06T18:25:00-0700"),
                ("GIT_COMMITTER_DATE", "2019-07-06T18:25:00-0700"),
                ("HOME", tempdir.as_str()),
            ])
            .current_dir(&tempdir);

        Ok(Self {
            git_depgraph,
            git_depgraph_args,
            command,
            tempdir,
        })
    }

    fn any_command(&self, program: &str) -> Command {
        let mut command = self.command.clone();
        command.name = program.into();
        command.to_std()
    }

    pub fn cmd(&self) -> Command {
        let mut command = self.command.clone();
        command.name = self.git_depgraph.clone();
        command = command.args(&self.git_depgraph_args);
        command.to_std()
    }

    /// Run `git-depgraph` with the given configuration file, expecting it to exit with status 1.
    ///
    /// Returns stderr with runs of whitespace collapsed to single spaces and the diagnostic's
    /// box-drawing characters removed, so wrapped messages can be matched.
    pub fn run_failing(&self, config: &Utf8Path) -> miette::Result<String> {
        let stderr = self.cmd().arg(config).output_checked_as(
            |context: OutputContext<Utf8Output>| match context.status().code() {
                Some(1) => Ok(context.output().stderr.clone()),
                _ => Err(context.error_msg("Expected exit status 1")),
            },
        )?;

        Ok(stderr
            .split_whitespace()
            .filter(|word| {
                !word
                    .chars()
                    .all(|c| matches!(c, '×' | '│' | '╰' | '├' | '─' | '▶' | '|' | '`' | '-' | '>'))
            })
            .join(" "))
    }

    pub fn path(&self, tail: &str) -> Utf8PathBuf {
        self.tempdir.join(tail)
    }

    pub fn sh(&self, script: &str) -> miette::Result<()> {
        let tempfile = tempfile::NamedTempFile::new().into_diagnostic()?;
        fs::write(
            &tempfile,
            format!(
                "set -ex\n\
                {script}"
            ),
        )
        .into_diagnostic()?;
        self.any_command("bash")
            .arg("--norc")
            .arg(tempfile.as_ref())
            .status_checked()
            .into_diagnostic()?;
        Ok(())
    }

    #[track_caller]
    pub fn git(&self, directory: &str) -> Git<Utf8PathBuf> {
        let path = self.path(directory);
        if !path.exists() {
            panic!("A test requested a Git interface for a nonexistent path: {directory}");
        }
        let mut git = Git::from_path(path);
        git.envs(self.command.environment.iter().filter_map(|(key, value)| {
            value.as_ref().map(|value| {
                (
                    key.to_owned().into_string().unwrap(),
                    value.to_owned().into_string().unwrap(),
                )
            })
        }));
        git
    }

    /// Set up a new repository in `path` with no commits.
    pub fn setup_empty_repo(&self, path: &str) -> miette::Result<Utf8PathBuf> {
        let path = self.path(path);
        let path_quoted = shell_words::quote(path.as_str());
        self.sh(&format!(
            r#"
            mkdir -p {path_quoted}
            cd {path_quoted} || exit
            git init
            "#
        ))?;
        Ok(path)
    }

    /// Set up a new repository in `path` with a single commit.
    pub fn setup_repo(&self, path: &str) -> miette::Result<Utf8PathBuf> {
        let path = self.setup_empty_repo(path)?;
        let path_quoted = shell_words::quote(path.as_str());
        self.sh(&format!(
            r#"
            cd {path_quoted} || exit
            echo "puppy doggy" > README.md
            git add .
            git commit -m "Initial commit"
            "#
        ))?;
        Ok(path)
    }

    /// Install a fake Graphviz in `graphviz/bin/dot` and return the installation directory.
    ///
    /// Instead of drawing an image, the fake `dot` copies the DOT source to the output path, so
    /// tests can read the rendered graph back with [`GitDepgraph::read_output`].
    pub fn setup_fake_graphviz(&self) -> miette::Result<Utf8PathBuf> {
        // `dot -Tpng -o OUTPUT SOURCE`
        self.setup_graphviz(r#"cp "$4" "$3""#)
    }

    /// Install a fake Graphviz whose `dot` succeeds without writing anything.
    pub fn setup_broken_graphviz(&self) -> miette::Result<Utf8PathBuf> {
        self.setup_graphviz("exit 0")
    }

    fn setup_graphviz(&self, dot_script: &str) -> miette::Result<Utf8PathBuf> {
        let graphviz = self.path("graphviz");
        fs::create_dir_all(graphviz.join("bin")).into_diagnostic()?;
        let dot = graphviz.join("bin/dot");
        fs::write(&dot, format!("#!/bin/sh\n{dot_script}\n")).into_diagnostic()?;
        self.sh(&format!("chmod +x {}", shell_words::quote(dot.as_str())))?;
        Ok(graphviz)
    }

    /// Write a `config.json` naming `graphviz_path` and `repository_path`, and return its path.
    pub fn write_config(
        &self,
        graphviz_path: &Utf8Path,
        repository_path: &Utf8Path,
    ) -> miette::Result<Utf8PathBuf> {
        self.write_config_raw(
            &serde_json::json!({
                "graphviz_path": graphviz_path.as_str(),
                "repository_path": repository_path.as_str(),
            })
            .to_string(),
        )
    }

    /// Write `contents` to `config.json` and return its path.
    pub fn write_config_raw(&self, contents: &str) -> miette::Result<Utf8PathBuf> {
        let path = self.path("config.json");
        fs::write(&path, contents)
            .into_diagnostic()
            .wrap_err("Failed to write `git-depgraph` configuration")?;
        Ok(path)
    }

    /// Read the file written to the default output path.
    pub fn read_output(&self) -> miette::Result<String> {
        let path = self.path(DEFAULT_OUTPUT);
        if !path.exists() {
            return Err(miette!("`git-depgraph` did not write {path}"));
        }
        fs::read_to_string(path).into_diagnostic()
    }
}
