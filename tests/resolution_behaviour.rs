//! Behaviour-driven coverage for the resolution engine.
//!
//! Scenarios exercise plural and sub-key selection, interpolation in both
//! output modes, the missing-translation policy, alias expansion on load,
//! and store replacement.

use std::cell::RefCell;
use std::collections::BTreeMap;

use phrasebook::testing::RecordingReporter;
use phrasebook::{Args, Config, Engine, MessageStore, Translation, TranslationNode};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

mod support;
use support::step_text::StepText;

#[derive(Default)]
struct ResolutionWorld {
    templates: RefCell<BTreeMap<String, String>>,
    groups: RefCell<BTreeMap<String, Vec<(String, String)>>>,
    config: RefCell<Config>,
    engine: RefCell<Option<Engine>>,
    reporter: RecordingReporter,
    result: RefCell<Option<Translation>>,
}

impl ResolutionWorld {
    fn build_store(&self) -> MessageStore {
        let mut store: MessageStore = self
            .templates
            .borrow()
            .iter()
            .map(|(key, text)| (key.clone(), text.clone()))
            .collect();
        for (key, branches) in self.groups.borrow().iter() {
            store.insert(key.clone(), TranslationNode::group(branches.iter().cloned()));
        }
        store
    }

    fn with_engine<R>(&self, action: impl FnOnce(&Engine) -> R) -> R {
        let mut slot = self.engine.borrow_mut();
        let engine = slot.get_or_insert_with(|| {
            Engine::new_with_reporter(
                self.build_store(),
                self.config.borrow().clone(),
                self.reporter.clone(),
            )
        });
        action(engine)
    }

    fn store_result(&self, translation: Translation) {
        self.result.borrow_mut().replace(translation);
    }

    fn result(&self) -> Translation {
        self.result
            .borrow()
            .as_ref()
            .cloned()
            .unwrap_or_else(|| panic!("a translation should have been requested"))
    }
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

#[given("the template {key} reads {text}")]
fn given_template(world: &ResolutionWorld, key: StepText, text: StepText) {
    world
        .templates
        .borrow_mut()
        .insert(key.into_inner(), text.into_inner());
}

#[given("the group {key} has branch {branch} reading {text}")]
fn given_branch(world: &ResolutionWorld, key: StepText, branch: StepText, text: StepText) {
    world
        .groups
        .borrow_mut()
        .entry(key.into_inner())
        .or_default()
        .push((branch.into_inner(), text.into_inner()));
}

#[given("debug mode is enabled")]
fn given_debug(world: &ResolutionWorld) {
    world.config.borrow_mut().debug = true;
}

#[given("missing keys fall back to the key")]
fn given_use_key(world: &ResolutionWorld) {
    world.config.borrow_mut().use_key_for_missing_translation = true;
}

#[given("array mode is enabled")]
fn given_array_mode(world: &ResolutionWorld) {
    world.config.borrow_mut().array_mode = true;
}

#[given("aliases are resolved on load")]
fn given_resolve_aliases(world: &ResolutionWorld) {
    world.config.borrow_mut().resolve_aliases = true;
}

#[when("I look up {key}")]
fn when_look_up(world: &ResolutionWorld, key: StepText) {
    let lookup = key.into_inner();
    let translation = world.with_engine(|engine| engine.t(&lookup).resolve());
    world.store_result(translation);
}

#[when("I count {count} of {key}")]
fn when_count(world: &ResolutionWorld, count: f64, key: StepText) {
    let lookup = key.into_inner();
    let translation = world.with_engine(|engine| engine.t(&lookup).arg(count).resolve());
    world.store_result(translation);
}

#[when("I choose {subkey} from {key}")]
fn when_choose(world: &ResolutionWorld, subkey: StepText, key: StepText) {
    let lookup = key.into_inner();
    let branch = subkey.into_inner();
    let translation = world.with_engine(|engine| engine.t(&lookup).arg(branch).resolve());
    world.store_result(translation);
}

#[when("I greet {name} using {key}")]
fn when_greet(world: &ResolutionWorld, name: StepText, key: StepText) {
    let lookup = key.into_inner();
    let args = Args::named().with("name", name.into_inner());
    let translation = world.with_engine(|engine| engine.t(&lookup).arg(args).resolve());
    world.store_result(translation);
}

#[when("I list {count} of {key} as a sequence")]
fn when_list(world: &ResolutionWorld, count: f64, key: StepText) {
    let lookup = key.into_inner();
    let pieces = world.with_engine(|engine| engine.t(&lookup).arg(count).arr());
    world.store_result(Translation::Sequence(pieces));
}

#[when("the store is replaced with the template {key} reading {text}")]
fn when_replace(world: &ResolutionWorld, key: StepText, text: StepText) {
    let mut store = MessageStore::new();
    store.insert(key.into_inner(), text.into_inner());
    world.with_engine(|engine| {
        let _previous = engine.set_keys(store);
    });
}

#[then("the result is {expected}")]
fn then_result(world: &ResolutionWorld, expected: StepText) {
    assert_eq!(world.result().to_string(), expected.into_inner());
}

#[then("the sequence has {length} elements")]
fn then_sequence_length(world: &ResolutionWorld, length: usize) {
    let result = world.result();
    let pieces = result
        .as_pieces()
        .unwrap_or_else(|| panic!("expected sequence output, got `{result}`"));
    assert_eq!(pieces.len(), length);
}

#[then("the reporter recorded {count} diagnostics")]
fn then_diagnostics(world: &ResolutionWorld, count: usize) {
    assert_eq!(
        world.reporter.len(),
        count,
        "recorded: {:?}",
        world.reporter.recorded()
    );
}

#[scenario(path = "tests/features/resolution.feature", index = 0)]
fn scenario_plural_exact(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 1)]
fn scenario_plural_fallback(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 2)]
fn scenario_subkey_default(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 3)]
fn scenario_subkey_unknown(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 4)]
fn scenario_subkey_exact(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 5)]
fn scenario_named_placeholders(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 6)]
fn scenario_sequence_output(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 7)]
fn scenario_array_mode(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/resolution.feature", index = 8)]
fn scenario_quoted_template(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/missing.feature", index = 0)]
fn scenario_use_key(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/missing.feature", index = 1)]
fn scenario_debug_sentinel(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/missing.feature", index = 2)]
fn scenario_missing_plural_branch(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/missing.feature", index = 3)]
fn scenario_missing_subkey_branch(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/aliases.feature", index = 0)]
fn scenario_aliases_expanded(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/aliases.feature", index = 1)]
fn scenario_aliases_disabled(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/aliases.feature", index = 2)]
fn scenario_alias_cycle(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/store_swap.feature", index = 0)]
fn scenario_store_replaced(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/store_swap.feature", index = 1)]
fn scenario_store_replaced_missing(world: ResolutionWorld) {
    let _ = world;
}
