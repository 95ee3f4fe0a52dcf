use std::path::PathBuf;

use anyhow::Result;
use futures::{channel::mpsc::Receiver, StreamExt};
use tracing::Instrument;

use crate::event::Event;
use crate::pipeline::{self, RunOutcome};
use crate::traits::PipelineSteps;
use crate::workspace::{RunId, Workspace};

pub(crate) async fn runner<S: PipelineSteps>(
    mut receiver: Receiver<Event>,
    steps: S,
    workspaces: PathBuf,
) {
    // loop runs until sender disconnects, one run at a time
    while let Some(event) = receiver.next().await {
        let ws = Workspace::new(&workspaces, RunId::generate());
        // the newest run stays on disk for inspection
        if let Err(error) = ws.prune_previous() {
            tracing::warn!("Could not remove previous runs: {error:#}");
        }
        if let Err(error) = handle_event(&steps, &ws, event)
            .instrument(tracing::info_span!("run", id = %ws.run_id()))
            .await
        {
            tracing::error!("{error:#}");
        }
    }
}

async fn handle_event<S: PipelineSteps>(steps: &S, ws: &Workspace, event: Event) -> Result<()> {
    match event {
        Event::PullRequestOpened(opened) => {
            tracing::info!("Handling {opened} in {}", ws.root().display());
            match pipeline::run(steps, ws, Some(&opened.pr_url)).await? {
                RunOutcome::Aborted => tracing::warn!("Run aborted, no reports published"),
                RunOutcome::Completed {
                    tests_passed,
                    comment,
                    ..
                } => tracing::info!(tests_passed, "Run finished, comment: {comment:?}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::{channel::mpsc::channel, SinkExt};

    use crate::comment::CommentStatus;
    use crate::event::PullRequestOpened;
    use crate::reports::ReportLinks;
    use crate::tool::ToolRun;

    use super::*;

    /// Every stage succeeds; checkouts and comments are recorded.
    #[derive(Default)]
    struct Recorder {
        checkouts: Mutex<Vec<PathBuf>>,
        comments: Mutex<Vec<String>>,
    }

    fn ok_run() -> ToolRun {
        ToolRun {
            program: "tool".to_owned(),
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            elapsed: std::time::Duration::ZERO,
        }
    }

    impl PipelineSteps for &Recorder {
        async fn checkout(&self, ws: &Workspace) -> Result<()> {
            std::fs::create_dir_all(ws.source_dir())?;
            self.checkouts.lock().unwrap().push(ws.source_dir());
            Ok(())
        }
        async fn install(&self, _ws: &Workspace) -> Result<ToolRun> {
            Ok(ok_run())
        }
        async fn run_tests(&self, _ws: &Workspace) -> Result<ToolRun> {
            Ok(ok_run())
        }
        async fn render_coverage(&self, _ws: &Workspace) -> Result<ToolRun> {
            Ok(ok_run())
        }
        async fn lint(&self, _ws: &Workspace) -> Result<ToolRun> {
            Ok(ok_run())
        }
        async fn publish(&self, _ws: &Workspace) -> Result<()> {
            Ok(())
        }
        async fn notify(&self, pr_url: &str, _links: &ReportLinks) -> Result<CommentStatus> {
            self.comments.lock().unwrap().push(pr_url.to_owned());
            Ok(CommentStatus::Posted)
        }
        fn links(&self) -> ReportLinks {
            ReportLinks::new("https://pages.example")
        }
    }

    async fn run_two_events(recorder: &Recorder, base: &std::path::Path) {
        let (mut sender, receiver) = channel(4);
        for n in 1..=2 {
            let opened = PullRequestOpened {
                pr_url: format!("https://api.example/pulls/{n}"),
            };
            sender.send(opened.into()).await.unwrap();
        }
        drop(sender);

        runner(receiver, recorder, base.to_path_buf()).await;
    }

    #[tokio::test]
    async fn test_each_event_gets_its_own_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        run_two_events(&recorder, tmp.path()).await;

        let checkouts = recorder.checkouts.lock().unwrap();
        assert_eq!(checkouts.len(), 2);
        assert_ne!(checkouts[0], checkouts[1]);
        assert!(checkouts.iter().all(|p| p.starts_with(tmp.path())));
        assert_eq!(
            *recorder.comments.lock().unwrap(),
            ["https://api.example/pulls/1", "https://api.example/pulls/2"]
        );
    }

    #[tokio::test]
    async fn test_only_newest_run_stays_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        run_two_events(&recorder, tmp.path()).await;

        let checkouts = recorder.checkouts.lock().unwrap();
        let newest = checkouts[1].parent().unwrap();
        assert!(!checkouts[0].exists());
        let remaining: Vec<PathBuf> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(remaining, [newest.to_path_buf()]);
    }
}
