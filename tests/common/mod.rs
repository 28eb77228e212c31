//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use synth_battle::battle::{start_battle, Battle, ContentCatalog, PlayerLoadout};
use synth_battle::cards::{CardData, CardRegistry, CardTag};
use synth_battle::core::{CombatantId, GameConfig, GameRng, InstanceId};
use synth_battle::effects::{CardEffect, TargetSelector};
use synth_battle::enemies::{
    AiCondition, AiPattern, EncounterData, EnemyData, EnemyRegistry, EnemySkill, IntentType,
    SkillEffect, WeightedSkill,
};

pub fn cards() -> CardRegistry {
    let mut cards = CardRegistry::new();
    let defs = [
        CardData::new("strike", "Strike", 1).with_effect(CardEffect::damage(6)),
        CardData::new("heavy_strike", "Heavy Strike", 2).with_effect(CardEffect::damage(6)),
        CardData::new("defend", "Defend", 1).with_effect(CardEffect::block(5)),
        CardData::new("ignite", "Ignite", 1).with_effect(CardEffect::dot(3, Some(2))),
        CardData::new("wildfire", "Wildfire", 1)
            .with_effect(CardEffect::dot(5, Some(2)).targeting(TargetSelector::AllEnemies)),
        CardData::new("cleave", "Cleave", 1)
            .with_effect(CardEffect::damage(4).targeting(TargetSelector::AllEnemies)),
        CardData::new("lance", "Lance", 1)
            .with_effect(CardEffect::damage(8))
            .with_tag(CardTag::Piercing),
        CardData::new("quick_draw", "Quick Draw", 0).with_effect(CardEffect::draw(2)),
        CardData::new("brace", "Brace", 1)
            .with_effect(CardEffect::block(3))
            .with_tag(CardTag::Retain),
        CardData::new("bolt", "Bolt", 1)
            .with_effect(CardEffect::damage(5).targeting(TargetSelector::RandomEnemy)),
        CardData::new("hobble", "Hobble", 1).with_effect(CardEffect::slow(1, None)),
    ];
    for card in defs {
        cards.register(card).expect("fixture card");
    }
    cards
}

pub fn enemies() -> EnemyRegistry {
    let mut enemies = EnemyRegistry::new();
    let defs = [
        EnemyData::new("slime", "Slime", 30, 5)
            .with_skill(EnemySkill::new("tackle", "Tackle", IntentType::Attack))
            .with_pattern(AiPattern::new(vec![WeightedSkill::new("tackle", 1)])),
        EnemyData::new("skewer", "Skewer", 40, 8)
            .with_skill(
                EnemySkill::new("impale", "Impale", IntentType::HeavyAttack)
                    .with_damage(8)
                    .piercing(),
            )
            .with_pattern(AiPattern::new(vec![WeightedSkill::new("impale", 1)])),
        EnemyData::new("mite", "Mite", 3, 4)
            .with_skill(EnemySkill::new("nibble", "Nibble", IntentType::Attack))
            .with_pattern(AiPattern::new(vec![WeightedSkill::new("nibble", 1)])),
        EnemyData::new("cultist", "Cultist", 45, 6)
            .with_skill(
                EnemySkill::new("chant", "Chant", IntentType::Buff)
                    .with_cooldown(2)
                    .with_effect(SkillEffect::Buff {
                        value: 2,
                        turns: Some(-1),
                    }),
            )
            .with_skill(EnemySkill::new("slash", "Slash", IntentType::Attack))
            .with_skill(
                EnemySkill::new("hex", "Hex", IntentType::Debuff).with_effect(SkillEffect::Debuff {
                    value: 1,
                    turns: Some(1),
                }),
            )
            .with_pattern(
                AiPattern::new(vec![WeightedSkill::new("hex", 1)]).when(AiCondition::FirstTurn),
            )
            .with_pattern(AiPattern::new(vec![
                WeightedSkill::new("chant", 10),
                WeightedSkill::new("slash", 1),
            ])),
        EnemyData::new("turtle", "Turtle", 25, 3)
            .with_base_block(4)
            .with_skill(EnemySkill::new("withdraw", "Withdraw", IntentType::Defend).with_block(6))
            .with_skill(EnemySkill::new("snap", "Snap", IntentType::Attack))
            .with_pattern(AiPattern::new(vec![
                WeightedSkill::new("withdraw", 1),
                WeightedSkill::new("snap", 1),
            ])),
        EnemyData::new("zealot", "Zealot", 40, 0)
            .with_skill(EnemySkill::new("rally", "Rally", IntentType::Buff).with_cooldown(1))
            .with_skill(EnemySkill::new("guard", "Guard", IntentType::Defend).with_block(2))
            .with_pattern(AiPattern::new(vec![
                WeightedSkill::new("rally", 1000),
                WeightedSkill::new("guard", 1),
            ])),
    ];
    for enemy in defs {
        enemies.register(enemy).expect("fixture enemy");
    }
    enemies
}

pub fn catalog() -> Arc<ContentCatalog> {
    Arc::new(ContentCatalog::new(cards(), enemies()))
}

pub fn loadout(deck: &[&str]) -> PlayerLoadout {
    let config = GameConfig::default();
    PlayerLoadout::from_config(&config, PlayerLoadout::deck_from_ids(deck.iter().copied()))
}

pub fn encounter(enemies: &[&str]) -> EncounterData {
    enemies
        .iter()
        .fold(EncounterData::new("fixture", "Fixture"), |e, id| e.with_enemy(*id))
}

pub fn start(deck: &[&str], enemies: &[&str], seed: u64) -> Battle {
    start_with(deck, encounter(enemies), seed, GameConfig::default())
}

pub fn start_with(deck: &[&str], encounter: EncounterData, seed: u64, config: GameConfig) -> Battle {
    start_battle(catalog(), &encounter, loadout(deck), seed, config).expect("battle starts")
}

/// First hand card with the given card id.
pub fn hand_instance(battle: &Battle, card: &str) -> InstanceId {
    battle
        .state()
        .player
        .piles
        .hand()
        .iter()
        .find(|c| c.card_id.as_str() == card)
        .map(|c| c.instance_id)
        .unwrap_or_else(|| panic!("{} not in hand", card))
}

pub const FIRST_ENEMY: Option<CombatantId> = Some(CombatantId::Enemy(0));

/// Play random legal actions until the battle ends or `max_steps` pass.
/// Choices come from a separate RNG so the battle's own RNG is untouched.
pub fn play_randomly(battle: &mut Battle, policy_seed: u64, max_steps: usize) {
    let mut policy = GameRng::new(policy_seed);
    for _ in 0..max_steps {
        if battle.is_over() {
            return;
        }
        let actions = battle.legal_actions();
        let index = policy.gen_index(actions.len()).expect("end turn is always legal");
        battle.apply(actions[index]).expect("legal action applies");
    }
}

/// Full deck of the fixture battle, for partition checks.
pub fn deck_ids(battle: &Battle) -> Vec<InstanceId> {
    let mut ids = battle.state().player.piles.instance_ids();
    ids.sort();
    ids
}
