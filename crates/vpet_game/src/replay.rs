use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use vpet_core::{Action, InputSource};

/// A scripted input run, one entry per tick after expansion.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    /// Request quit once every frame has been played.
    #[serde(default = "default_quit_at_end")]
    pub quit_at_end: bool,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayScript {
    pub fn expanded_actions(&self) -> Vec<Vec<Action>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.actions.clone());
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplayScript) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_quit_at_end() -> bool {
    true
}

const fn default_repeat() -> u32 {
    1
}

/// Feeds a replay script to the simulation one tick at a time.
#[derive(Debug, Default)]
pub struct ReplayInput {
    remaining: VecDeque<Vec<Action>>,
    current: Vec<Action>,
    quit_at_end: bool,
    quit_requested: bool,
    ticks_played: u64,
}

impl ReplayInput {
    pub fn new(script: &ReplayScript) -> Self {
        Self {
            remaining: script.expanded_actions().into(),
            quit_at_end: script.quit_at_end,
            ..Self::default()
        }
    }

    /// An input source that never produces anything.
    pub fn idle() -> Self {
        Self::default()
    }
}

impl InputSource for ReplayInput {
    fn update(&mut self) {
        match self.remaining.pop_front() {
            Some(actions) => {
                self.ticks_played += 1;
                if actions.contains(&Action::Quit) {
                    self.quit_requested = true;
                }
                self.current = actions;
            }
            None => {
                self.current.clear();
                if self.quit_at_end && !self.quit_requested {
                    log::info!("Replay finished after {} ticks", self.ticks_played);
                    self.quit_requested = true;
                }
            }
        }
    }

    fn was_action_pressed(&self, action: Action) -> bool {
        self.current.contains(&action)
    }

    fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use vpet_core::CharacterId;

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "vpet_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "actions": ["step"] },
                { "repeat": 3 },
                { "actions": [{ "select": "gomamon" }, "step"], "repeat": 1 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert!(replay.quit_at_end);
        let expanded = replay.expanded_actions();
        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded[0], vec![Action::Step]);
        assert!(expanded[2].is_empty());
        assert_eq!(
            expanded[4],
            vec![Action::SelectCharacter(CharacterId::Gomamon), Action::Step]
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn input_plays_one_frame_per_update_then_quits() {
        let script = ReplayScript {
            quit_at_end: true,
            frames: vec![
                ReplayFrame {
                    actions: vec![Action::Step],
                    repeat: 2,
                },
                ReplayFrame {
                    actions: vec![],
                    repeat: 1,
                },
            ],
        };
        let mut input = ReplayInput::new(&script);
        assert!(!input.was_action_pressed(Action::Step));

        input.update();
        assert!(input.was_action_pressed(Action::Step));
        input.update();
        assert!(input.was_action_pressed(Action::Step));
        input.update();
        assert!(!input.was_action_pressed(Action::Step));
        assert!(!input.is_quit_requested());
        assert!(input.remaining.is_empty());

        input.update();
        assert!(input.is_quit_requested());
        assert_eq!(input.ticks_played, 3);
    }

    #[test]
    fn scripted_quit_is_sticky() {
        let script = ReplayScript {
            quit_at_end: false,
            frames: vec![
                ReplayFrame {
                    actions: vec![Action::Quit],
                    repeat: 1,
                },
                ReplayFrame {
                    actions: vec![Action::Step],
                    repeat: 1,
                },
            ],
        };
        let mut input = ReplayInput::new(&script);
        input.update();
        input.update();
        assert!(input.is_quit_requested());
    }

    #[test]
    fn idle_input_never_quits() {
        let mut input = ReplayInput::idle();
        for _ in 0..10 {
            input.update();
        }
        assert!(!input.is_quit_requested());
        assert!(!input.was_action_pressed(Action::Step));
    }
}
