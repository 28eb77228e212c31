//! The battle state machine.
//!
//! ```text
//! START -> PLAYER_TURN -> PLAYER_END -> ENEMY_TURN -> ENEMY_END -> PLAYER_TURN ...
//! ```
//!
//! Any step that leaves a side wiped out (or passes the turn limit) jumps
//! straight to `END`. Player calls are transactional: the state and RNG are
//! checkpointed before the call and restored if it fails, so a rejected
//! action leaves no trace, not even in the log.

use std::sync::Arc;

use super::history::{BattleHistory, BattleOutcome};
use super::setup::{ContentCatalog, PlayerLoadout};
use crate::core::{
    Action, ActionRecord, BattleError, BattleLog, BattleLogEntry, BattlePhase, BattleResult,
    BattleState, BattleStats, CombatantId, EncounterInstance, GameConfig, GameRng, InstanceId,
    LogEvent, PlayerState, SkipReason,
};
use crate::deck::DeckPiles;
use crate::effects::{needs_target, validate_choice, EffectResolver, EffectSource};
use crate::enemies::{AiContext, EncounterData, EnemyAi, EnemyInstance, Intent};
use crate::status::{StatusEffect, StatusKind, StatusList, TickTiming};

/// What one call to the battle produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Phase after the call.
    pub phase: BattlePhase,
    /// Log entries appended by the call, in order.
    pub entries: Vec<BattleLogEntry>,
    /// Set once the battle has ended.
    pub history: Option<BattleHistory>,
}

impl StepOutcome {
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::End
    }
}

/// A battle in progress.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use synth_battle::battle::{start_battle, ContentCatalog, PlayerLoadout};
/// use synth_battle::cards::{CardData, CardRegistry};
/// use synth_battle::core::{BattlePhase, GameConfig};
/// use synth_battle::effects::CardEffect;
/// use synth_battle::enemies::{
///     AiPattern, EncounterData, EnemyData, EnemyRegistry, EnemySkill, IntentType, WeightedSkill,
/// };
///
/// let mut cards = CardRegistry::new();
/// cards.register(CardData::new("strike", "Strike", 1).with_effect(CardEffect::damage(6))).unwrap();
///
/// let mut enemies = EnemyRegistry::new();
/// enemies.register(
///     EnemyData::new("slime", "Slime", 12, 3)
///         .with_skill(EnemySkill::new("tackle", "Tackle", IntentType::Attack))
///         .with_pattern(AiPattern::new(vec![WeightedSkill::new("tackle", 1)])),
/// ).unwrap();
///
/// let catalog = Arc::new(ContentCatalog::new(cards, enemies));
/// let config = GameConfig::default();
/// let deck = PlayerLoadout::deck_from_ids(vec!["strike"; 5]);
/// let encounter = EncounterData::new("one_slime", "One Slime").with_enemy("slime");
///
/// let battle = start_battle(catalog, &encounter, PlayerLoadout::from_config(&config, deck), 42, config)
///     .unwrap();
/// assert_eq!(battle.phase(), BattlePhase::PlayerTurn);
/// assert_eq!(battle.state().player.piles.hand().len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct Battle {
    catalog: Arc<ContentCatalog>,
    config: GameConfig,
    state: BattleState,
    rng: GameRng,
}

/// Create a battle and run it to the first player turn.
pub fn start_battle(
    catalog: Arc<ContentCatalog>,
    encounter: &EncounterData,
    loadout: PlayerLoadout,
    seed: u64,
    config: GameConfig,
) -> BattleResult<Battle> {
    let mut battle = Battle::new(catalog, encounter, loadout, seed, config)?;
    battle.begin()?;
    Ok(battle)
}

impl Battle {
    /// Create a battle in `START`.
    ///
    /// Validates config and content, shuffles the deck into the draw pile,
    /// spawns the enemies, applies the encounter's special rules, and
    /// announces the first intents.
    pub fn new(
        catalog: Arc<ContentCatalog>,
        encounter: &EncounterData,
        loadout: PlayerLoadout,
        seed: u64,
        config: GameConfig,
    ) -> BattleResult<Self> {
        config.validate()?;
        catalog.enemies.validate_encounter(encounter)?;
        loadout.validate(&catalog.cards)?;

        let mut rng = GameRng::new(seed);
        let mut piles = DeckPiles::new(loadout.deck);
        piles.shuffle_draw_pile(&mut rng);

        let rules = &encounter.special_rules;
        let mut enemies = im::Vector::new();
        for (slot, id) in encounter.enemies.iter().enumerate() {
            let data = catalog.enemies.lookup(id)?;
            data.validate()?;
            let enemy = EnemyInstance::spawn(slot, data, &config);
            enemies.push_back(match rules.starting_block {
                Some(block) => enemy.with_block(block),
                None => enemy,
            });
        }

        let state = BattleState {
            phase: BattlePhase::Start,
            turn: 1,
            player: PlayerState {
                current_hp: loadout.current_hp,
                max_hp: loadout.max_hp,
                energy: 0,
                max_energy: config.max_energy,
                piles,
                statuses: StatusList::new(),
            },
            block: 0,
            encounter: EncounterInstance {
                encounter_id: encounter.id.clone(),
                enemies,
                turn_limit: rules.turn_limit,
                is_completed: false,
                victory: None,
            },
            stats: BattleStats::default(),
            action_history: im::Vector::new(),
            log: BattleLog::new(),
            history: None,
        };

        let mut battle = Self {
            catalog,
            config,
            state,
            rng,
        };
        battle.log_roster();

        if let Some(status) = rules.player_debuff.clone() {
            battle.apply_player_status(status);
        }

        battle.announce_intents()?;
        Ok(battle)
    }

    /// `START -> PLAYER_TURN`.
    pub fn begin(&mut self) -> BattleResult<StepOutcome> {
        self.transact(|battle| {
            battle.expect_phase(BattlePhase::Start)?;
            battle.start_player_turn();
            Ok(())
        })
    }

    /// Play a card from hand.
    pub fn play_card(
        &mut self,
        instance: InstanceId,
        target: Option<CombatantId>,
    ) -> BattleResult<StepOutcome> {
        self.apply(Action::play(instance, target))
    }

    /// End the player's turn and run the enemy turn.
    pub fn end_turn(&mut self) -> BattleResult<StepOutcome> {
        self.apply(Action::EndTurn)
    }

    /// Run a player action. On success the action is added to the
    /// action history; on failure nothing changes.
    pub fn apply(&mut self, action: Action) -> BattleResult<StepOutcome> {
        self.transact(|battle| {
            let turn = battle.state.turn;
            match action {
                Action::PlayCard { instance, target } => battle.resolve_card(instance, target)?,
                Action::EndTurn => battle.run_turn_cycle()?,
            }

            let sequence = battle.state.action_history.len() as u32;
            let record = ActionRecord::new(action, turn, sequence);
            battle.state.action_history.push_back(record);
            Ok(())
        })
    }

    /// Every action the player could take right now.
    ///
    /// Cards needing a chosen enemy get one action per living enemy.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.state.phase != BattlePhase::PlayerTurn {
            return Vec::new();
        }

        let targets = self.state.living_opponents(CombatantId::Player);
        let mut actions = Vec::new();

        for card in self.state.player.piles.hand() {
            let Some(data) = self.catalog.cards.get(&card.card_id) else {
                continue;
            };
            if card.effective_cost(data) > self.state.player.energy {
                continue;
            }

            if needs_target(card.effective_effects(data), CombatantId::Player) {
                actions.extend(
                    targets
                        .iter()
                        .map(|&target| Action::play(card.instance_id, Some(target))),
                );
            } else {
                actions.push(Action::play(card.instance_id, None));
            }
        }

        actions.push(Action::EndTurn);
        actions
    }

    /// Give up. Forces `END` with outcome `Abandoned` and returns the
    /// partial history.
    pub fn abandon(&mut self) -> BattleResult<BattleHistory> {
        if self.state.is_over() {
            return Err(BattleError::InvalidPhase {
                expected: BattlePhase::PlayerTurn,
                actual: BattlePhase::End,
            });
        }
        Ok(self.finish(BattleOutcome::Abandoned))
    }

    /// Rebuild a battle from its inputs and an action list.
    pub fn replay(
        catalog: Arc<ContentCatalog>,
        encounter: &EncounterData,
        loadout: PlayerLoadout,
        seed: u64,
        config: GameConfig,
        actions: impl IntoIterator<Item = Action>,
    ) -> BattleResult<Self> {
        let mut battle = start_battle(catalog, encounter, loadout, seed, config)?;
        for action in actions {
            battle.apply(action)?;
        }
        Ok(battle)
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// An owned copy of the state. Cheap: every collection is shared.
    #[must_use]
    pub fn snapshot(&self) -> BattleState {
        self.state.clone()
    }

    #[must_use]
    pub fn log(&self) -> &BattleLog {
        &self.state.log
    }

    #[must_use]
    pub fn history(&self) -> Option<&BattleHistory> {
        self.state.history.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// The intent an enemy has announced for its next turn.
    #[must_use]
    pub fn peek_intent(&self, slot: usize) -> Option<&Intent> {
        self.state
            .enemy(slot)
            .filter(|e| e.is_alive())
            .and_then(|e| e.current_intent.as_ref())
    }

    // === Transactions ===

    fn transact(
        &mut self,
        step: impl FnOnce(&mut Self) -> BattleResult<()>,
    ) -> BattleResult<StepOutcome> {
        let checkpoint = (self.state.clone(), self.rng.clone());
        let start = self.state.log.len();

        if let Err(err) = step(self) {
            (self.state, self.rng) = checkpoint;
            return Err(err);
        }

        Ok(StepOutcome {
            phase: self.state.phase,
            entries: self.state.log.since(start),
            history: self.state.history.clone(),
        })
    }

    fn expect_phase(&self, expected: BattlePhase) -> BattleResult<()> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(BattleError::InvalidPhase {
                expected,
                actual: self.state.phase,
            })
        }
    }

    // === Setup helpers ===

    fn log_roster(&mut self) {
        let player = LogEvent::CombatantJoined {
            name: "Player".to_string(),
            hp: self.state.player.current_hp,
            max_hp: self.state.player.max_hp,
            block: self.state.block,
        };
        self.state
            .record(None, "join", Some(CombatantId::Player), player);

        let joined: Vec<_> = self
            .state
            .encounter
            .enemies
            .iter()
            .map(|e| {
                (
                    CombatantId::Enemy(e.slot),
                    LogEvent::CombatantJoined {
                        name: e.name.clone(),
                        hp: e.current_hp,
                        max_hp: e.max_hp,
                        block: e.current_block,
                    },
                )
            })
            .collect();
        for (id, event) in joined {
            self.state.record(None, "join", Some(id), event);
        }
    }

    fn apply_player_status(&mut self, status: StatusEffect) {
        let (id, kind) = (status.id.clone(), status.kind);
        let outcome = self.state.player.statuses.apply(status);
        let (magnitude, duration) = self
            .state
            .player
            .statuses
            .get(&id)
            .map_or((0, 0), |s| (s.magnitude, s.duration));

        self.state.record(
            None,
            "encounter rule",
            Some(CombatantId::Player),
            LogEvent::StatusApplied {
                status: id,
                kind,
                outcome,
                magnitude,
                duration,
            },
        );
    }

    // === Phases ===

    /// Energy, block clear, turn-start ticks, then draw up to hand size.
    fn start_player_turn(&mut self) {
        self.state.set_phase(BattlePhase::PlayerTurn);
        let player = Some(CombatantId::Player);

        let slow = self.state.player.statuses.total(StatusKind::Slow);
        let before = self.state.player.energy;
        let energy_after = self
            .state
            .player
            .set_energy(self.config.energy_per_turn - slow);
        self.state.record(
            player,
            "energy",
            player,
            LogEvent::Energy {
                delta: energy_after - before,
                energy_after,
            },
        );

        if !self.config.retain_player_block && self.state.block > 0 {
            let before = self.state.block;
            self.state.block = 0;
            self.state.record(
                None,
                "block expires",
                player,
                LogEvent::BlockCleared {
                    before,
                    block_after: 0,
                },
            );
        }

        EffectResolver::tick_statuses(&mut self.state, CombatantId::Player, TickTiming::TurnStart);
        if self.finish_if_terminal() {
            return;
        }

        let wanted = self
            .config
            .hand_size
            .saturating_sub(self.state.player.piles.hand().len());
        let report = self.state.player.piles.draw(wanted, &mut self.rng);
        for cards in report.reshuffles {
            self.state.record(
                player,
                "draw",
                player,
                LogEvent::Reshuffle {
                    cards: cards as u32,
                },
            );
        }
        self.state.record(
            player,
            "draw",
            player,
            LogEvent::Draw {
                requested: wanted as u32,
                drawn: report.drawn,
            },
        );
    }

    fn resolve_card(
        &mut self,
        instance: InstanceId,
        target: Option<CombatantId>,
    ) -> BattleResult<()> {
        self.expect_phase(BattlePhase::PlayerTurn)?;

        let catalog = Arc::clone(&self.catalog);
        let card = self
            .state
            .player
            .piles
            .hand_card(instance)
            .cloned()
            .ok_or(BattleError::CardNotInHand(instance))?;
        let data = catalog.cards.lookup(&card.card_id)?;

        let cost = card.effective_cost(data);
        let available = self.state.player.energy;
        if cost > available {
            return Err(BattleError::InsufficientEnergy {
                required: cost,
                available,
            });
        }

        let effects = card.effective_effects(data);
        validate_choice(&self.state, effects, CombatantId::Player, target)?;

        let energy_after = self.state.player.set_energy(available - cost);
        self.state.record(
            Some(CombatantId::Player),
            data.name.as_str(),
            target,
            LogEvent::CardPlayed {
                instance,
                card: card.card_id.clone(),
                cost,
                energy_after,
            },
        );
        self.state.stats.cards_played.push_back(card.card_id.clone());

        let source = EffectSource::new(CombatantId::Player, data.name.as_str())
            .with_damage_bonus(card.temp_buff)
            .with_piercing(data.is_piercing());
        EffectResolver::resolve(&mut self.state, &mut self.rng, &source, effects, target)?;

        if data.exhausts() {
            self.state.player.piles.exhaust(instance);
            self.state.record(
                Some(CombatantId::Player),
                data.name.as_str(),
                None,
                LogEvent::Exhausted { instance },
            );
        } else {
            self.state.player.piles.discard(instance);
        }

        self.finish_if_terminal();
        Ok(())
    }

    /// `PLAYER_END -> ENEMY_TURN -> ENEMY_END -> PLAYER_TURN`, stopping
    /// early at `END`.
    fn run_turn_cycle(&mut self) -> BattleResult<()> {
        self.expect_phase(BattlePhase::PlayerTurn)?;

        if self.end_player_turn() {
            return Ok(());
        }
        if self.run_enemy_turn()? {
            return Ok(());
        }
        if self.end_enemy_turn()? {
            return Ok(());
        }
        self.start_player_turn();
        Ok(())
    }

    /// Returns `true` if the battle ended.
    fn end_player_turn(&mut self) -> bool {
        self.state.set_phase(BattlePhase::PlayerEnd);

        let catalog = Arc::clone(&self.catalog);
        let discarded = self.state.player.piles.discard_hand(|card| {
            catalog
                .cards
                .get(&card.card_id)
                .is_some_and(|data| data.is_retained())
        });
        self.state.player.piles.reset_turn_modifiers();
        self.state.record(
            Some(CombatantId::Player),
            "discard hand",
            None,
            LogEvent::Discarded { cards: discarded },
        );

        EffectResolver::tick_statuses(&mut self.state, CombatantId::Player, TickTiming::TurnEnd);
        self.finish_if_terminal()
    }

    /// Every living enemy acts on its locked intent, in slot order.
    /// Returns `true` if the battle ended.
    fn run_enemy_turn(&mut self) -> BattleResult<bool> {
        self.state.set_phase(BattlePhase::EnemyTurn);

        let mut locked = Vec::new();
        for enemy in self.state.encounter.enemies.iter_mut() {
            enemy.begin_turn();
            if enemy.is_alive() {
                locked.push((enemy.slot, enemy.current_intent.clone()));
            }
        }

        let catalog = Arc::clone(&self.catalog);
        for (slot, intent) in locked {
            let actor = CombatantId::Enemy(slot);
            if !self.state.is_alive(actor) {
                continue;
            }

            EffectResolver::tick_statuses(&mut self.state, actor, TickTiming::TurnStart);
            if self.finish_if_terminal() {
                return Ok(true);
            }
            let Some(enemy) = self.state.enemy(slot).filter(|e| e.is_alive()) else {
                continue;
            };
            let (enemy_id, base_block, slowed) = (
                enemy.enemy_id.clone(),
                enemy.base_block,
                enemy.statuses.is_slowed(),
            );

            if base_block > 0 {
                if let Some(mut view) = self.state.combatant_mut(actor) {
                    let block_after = view.add_block(base_block);
                    self.state.record(
                        Some(actor),
                        "base block",
                        Some(actor),
                        LogEvent::Block {
                            amount: base_block,
                            block_after,
                        },
                    );
                }
            }

            if slowed {
                self.skip_enemy(actor, SkipReason::Slowed);
                continue;
            }
            let Some(intent) = intent else {
                self.skip_enemy(actor, SkipReason::NoIntent);
                continue;
            };

            let data = catalog.enemies.lookup(&enemy_id)?;
            let skill = data.lookup_skill(&intent.skill)?;
            let effects = skill.to_effects(data.damage, &self.config);

            if let Some(enemy) = self.state.enemy_mut(slot) {
                enemy.record_execution(skill.id.clone(), self.config.anti_repeat_window);
            }
            self.state.record(
                Some(actor),
                skill.name.as_str(),
                None,
                LogEvent::SkillUsed {
                    skill: skill.id.clone(),
                    intent: intent.intent_type,
                },
            );

            let source = EffectSource::new(actor, skill.name.as_str());
            EffectResolver::resolve(&mut self.state, &mut self.rng, &source, &effects, None)?;
            if self.finish_if_terminal() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn skip_enemy(&mut self, actor: CombatantId, reason: SkipReason) {
        self.state
            .record(Some(actor), "skip", None, LogEvent::ActionSkipped { reason });
    }

    /// Cooldowns, turn-end ticks, block expiry, turn limit, turn advance,
    /// next intents.
    /// Returns `true` if the battle ended.
    fn end_enemy_turn(&mut self) -> BattleResult<bool> {
        self.state.set_phase(BattlePhase::EnemyEnd);

        for enemy in self.state.encounter.enemies.iter_mut() {
            enemy.decrement_cooldowns();
        }

        let living: Vec<usize> = self.state.encounter.living_slots().collect();
        for &slot in &living {
            EffectResolver::tick_statuses(&mut self.state, CombatantId::Enemy(slot), TickTiming::TurnEnd);
        }
        if self.finish_if_terminal() {
            return Ok(true);
        }

        for slot in living {
            let Some(enemy) = self.state.enemy_mut(slot) else {
                continue;
            };
            let before = enemy.expire_block();
            let block_after = enemy.current_block;
            if block_after != before {
                self.state.record(
                    None,
                    "block expires",
                    Some(CombatantId::Enemy(slot)),
                    LogEvent::BlockCleared {
                        before,
                        block_after,
                    },
                );
            }
        }

        if let Some(limit) = self.state.encounter.turn_limit {
            if self.state.turn >= limit {
                self.finish(BattleOutcome::TurnLimit);
                return Ok(true);
            }
        }
        self.state.turn += 1;

        self.announce_intents()?;
        Ok(false)
    }

    /// Decide and commit the next intent of every living enemy.
    fn announce_intents(&mut self) -> BattleResult<()> {
        let catalog = Arc::clone(&self.catalog);
        let living: Vec<usize> = self.state.encounter.living_slots().collect();

        for slot in living {
            let Some(enemy) = self.state.enemy(slot) else {
                continue;
            };
            let data = catalog.enemies.lookup(&enemy.enemy_id)?;
            let ctx = AiContext::new(&self.state, enemy);
            let decision = EnemyAi::decide(data, enemy, &ctx, &mut self.rng)?;

            let enemy = self
                .state
                .enemy_mut(slot)
                .ok_or(BattleError::InvalidTarget(Some(CombatantId::Enemy(slot))))?;
            let intent = EnemyAi::commit(data, enemy, &decision, &self.config)?;

            self.state.record(
                Some(CombatantId::Enemy(slot)),
                "intent",
                Some(CombatantId::Player),
                LogEvent::IntentSet {
                    skill: intent.skill,
                    intent: intent.intent_type,
                    damage: intent.damage,
                    hits: intent.hits,
                },
            );
        }
        Ok(())
    }

    // === Ending ===

    /// Move to `END` if a side is wiped out. Returns `true` once over.
    fn finish_if_terminal(&mut self) -> bool {
        if self.state.is_over() {
            return true;
        }
        match self.state.terminal_outcome() {
            Some(outcome) => {
                self.finish(outcome);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) -> BattleHistory {
        self.state.set_phase(BattlePhase::End);
        self.state.encounter.is_completed = true;
        self.state.encounter.victory = Some(outcome.is_victory());
        self.state
            .record(None, "battle end", None, LogEvent::BattleEnded { outcome });

        let history = BattleHistory::archive(&self.state, outcome);
        self.state.history = Some(history.clone());
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardRegistry, CardTag};
    use crate::effects::CardEffect;
    use crate::enemies::{AiPattern, EnemyData, EnemyRegistry, EnemySkill, IntentType, WeightedSkill};

    fn catalog() -> Arc<ContentCatalog> {
        let mut cards = CardRegistry::new();
        cards
            .register(CardData::new("strike", "Strike", 1).with_effect(CardEffect::damage(6)))
            .unwrap();
        cards
            .register(CardData::new("defend", "Defend", 1).with_effect(CardEffect::block(5)))
            .unwrap();
        cards
            .register(
                CardData::new("offering", "Offering", 0)
                    .with_effect(CardEffect::energy(2))
                    .with_tag(CardTag::Exhaust),
            )
            .unwrap();

        let mut enemies = EnemyRegistry::new();
        enemies
            .register(
                EnemyData::new("dummy", "Dummy", 30, 4)
                    .with_skill(EnemySkill::new("poke", "Poke", IntentType::Attack))
                    .with_pattern(AiPattern::new(vec![WeightedSkill::new("poke", 1)])),
            )
            .unwrap();

        Arc::new(ContentCatalog::new(cards, enemies))
    }

    fn battle(deck: &[&str]) -> Battle {
        let config = GameConfig::default();
        let loadout = PlayerLoadout::from_config(&config, PlayerLoadout::deck_from_ids(deck.iter().copied()));
        let encounter = EncounterData::new("dummy", "Dummy").with_enemy("dummy");
        start_battle(catalog(), &encounter, loadout, 7, config).unwrap()
    }

    fn hand_instance(battle: &Battle, card: &str) -> InstanceId {
        battle
            .state()
            .player
            .piles
            .hand()
            .iter()
            .find(|c| c.card_id.as_str() == card)
            .map(|c| c.instance_id)
            .unwrap()
    }

    #[test]
    fn test_start_announces_and_draws() {
        let battle = battle(&["strike"; 7]);
        assert_eq!(battle.phase(), BattlePhase::PlayerTurn);
        assert_eq!(battle.state().turn, 1);
        assert_eq!(battle.state().player.energy, 3);
        assert_eq!(battle.state().player.piles.hand().len(), 5);
        assert_eq!(battle.peek_intent(0).unwrap().damage, Some(4));
    }

    #[test]
    fn test_begin_twice_rejected() {
        let mut battle = battle(&["strike"; 5]);
        let err = battle.begin().unwrap_err();
        assert_eq!(
            err,
            BattleError::InvalidPhase {
                expected: BattlePhase::Start,
                actual: BattlePhase::PlayerTurn,
            }
        );
    }

    #[test]
    fn test_play_card_moves_to_discard() {
        let mut battle = battle(&["strike"; 5]);
        let id = hand_instance(&battle, "strike");

        let step = battle.play_card(id, Some(CombatantId::Enemy(0))).unwrap();
        assert_eq!(step.phase, BattlePhase::PlayerTurn);
        assert_eq!(battle.state().enemy(0).unwrap().current_hp, 24);
        assert_eq!(battle.state().player.energy, 2);
        assert!(battle.state().player.piles.discard_pile().iter().any(|c| c.instance_id == id));
        assert_eq!(battle.state().action_history.len(), 1);
    }

    #[test]
    fn test_exhaust_tag() {
        let mut battle = battle(&["offering"; 5]);
        let id = hand_instance(&battle, "offering");
        battle.play_card(id, None).unwrap();

        assert_eq!(battle.state().player.energy, 3);
        assert_eq!(battle.state().player.piles.exhaust_pile().len(), 1);
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut battle = battle(&["strike"; 5]);
        let before = battle.snapshot();
        let rng_before = battle.rng().clone();
        let id = hand_instance(&battle, "strike");

        assert_eq!(
            battle.play_card(id, None).unwrap_err(),
            BattleError::InvalidTarget(None)
        );
        assert_eq!(
            battle.play_card(InstanceId::new(99), None).unwrap_err(),
            BattleError::CardNotInHand(InstanceId::new(99))
        );
        assert!(battle.play_card(id, Some(CombatantId::Enemy(3))).is_err());
        assert!(battle.play_card(id, Some(CombatantId::Player)).is_err());

        assert_eq!(battle.snapshot(), before);
        assert_eq!(battle.rng(), &rng_before);
    }

    #[test]
    fn test_insufficient_energy() {
        let mut battle = battle(&["strike"; 5]);
        let target = Some(CombatantId::Enemy(0));
        let hand: Vec<_> = battle.state().player.piles.hand().iter().map(|c| c.instance_id).collect();
        for id in &hand[..3] {
            battle.play_card(*id, target).unwrap();
        }

        assert_eq!(
            battle.play_card(hand[3], target).unwrap_err(),
            BattleError::InsufficientEnergy {
                required: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_end_turn_cycle() {
        let mut battle = battle(&["defend"; 10]);
        let id = hand_instance(&battle, "defend");
        battle.play_card(id, None).unwrap();
        assert_eq!(battle.state().block, 5);

        let step = battle.end_turn().unwrap();
        assert_eq!(step.phase, BattlePhase::PlayerTurn);
        assert_eq!(battle.state().turn, 2);
        // Block soaked the poke, then cleared at turn start.
        assert_eq!(battle.state().player.current_hp, 80);
        assert_eq!(battle.state().block, 0);
        assert_eq!(battle.state().player.energy, 3);
        assert_eq!(battle.state().player.piles.hand().len(), 5);
        assert_eq!(battle.state().enemy(0).unwrap().turn_count, 1);
    }

    #[test]
    fn test_legal_actions() {
        let battle = battle(&["strike", "defend", "strike", "defend", "offering"]);
        let actions = battle.legal_actions();

        // Two strikes aimed at the one enemy, two defends, one offering, end turn.
        assert_eq!(actions.len(), 6);
        assert_eq!(actions.last(), Some(&Action::EndTurn));
        assert!(actions
            .iter()
            .filter(|a| a.card().is_some())
            .all(|a| battle.state().player.piles.hand_card(a.card().unwrap()).is_some()));
    }

    #[test]
    fn test_abandon() {
        let mut battle = battle(&["strike"; 5]);
        let history = battle.abandon().unwrap();

        assert_eq!(history.outcome, BattleOutcome::Abandoned);
        assert!(!history.victory);
        assert!(battle.is_over());
        assert_eq!(battle.state().encounter.victory, Some(false));
        assert!(battle.legal_actions().is_empty());
        assert!(battle.abandon().is_err());
        assert!(matches!(
            battle.end_turn(),
            Err(BattleError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_turn_limit() {
        let config = GameConfig::default();
        let loadout = PlayerLoadout::from_config(&config, PlayerLoadout::deck_from_ids(["defend"; 5]));
        let encounter = EncounterData::new("timed", "Timed")
            .with_enemy("dummy")
            .with_turn_limit(2);
        let mut battle = start_battle(catalog(), &encounter, loadout, 1, config).unwrap();

        battle.end_turn().unwrap();
        assert_eq!(battle.state().turn, 2);
        let step = battle.end_turn().unwrap();

        assert!(step.is_over());
        let history = step.history.unwrap();
        assert_eq!(history.outcome, BattleOutcome::TurnLimit);
        assert!(!history.victory);
        assert_eq!(history.turns, 2);
        assert_eq!(battle.state().turn, 2);
        assert_eq!(battle.log().last().unwrap().turn, 2);
    }
}
