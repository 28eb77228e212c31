//! Enemy instances - the mutable per-battle side of an enemy.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::definition::{EnemyData, EnemySkill, IntentType};
use crate::core::{EnemyId, GameConfig, SkillId};
use crate::status::StatusList;

/// What an enemy announced it will do on its next turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub skill: SkillId,
    pub intent_type: IntentType,
    /// Scaled damage per hit, if the skill attacks.
    pub damage: Option<i32>,
    pub hits: u32,
    pub block: Option<i32>,
}

impl Intent {
    /// Describe a skill as the player will see it.
    #[must_use]
    pub fn from_skill(skill: &EnemySkill, enemy_damage: i32, config: &GameConfig) -> Self {
        let damage = skill.scaled_damage(enemy_damage, config);
        Self {
            skill: skill.id.clone(),
            intent_type: skill.intent,
            damage,
            hits: if damage.is_some() { skill.hits } else { 0 },
            block: skill.block,
        }
    }

    /// Total damage if every hit lands unblocked.
    #[must_use]
    pub fn total_damage(&self) -> i32 {
        self.damage.map_or(0, |d| d * self.hits as i32)
    }
}

/// An enemy in a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyInstance {
    /// Position in the encounter; stable for the whole battle.
    pub slot: usize,
    pub enemy_id: EnemyId,
    pub name: String,

    pub max_hp: i32,
    /// Within `[0, max_hp]`. The enemy is defeated at 0.
    pub current_hp: i32,
    pub current_block: i32,
    /// Block gained since the start of this enemy's turn.
    pub block_gained_this_turn: i32,
    /// Gained at the start of each of this enemy's turns.
    pub base_block: i32,
    pub retains_block: bool,

    pub current_intent: Option<Intent>,
    /// Turns left before a skill may be chosen again. Absent means ready.
    pub skill_cooldowns: OrdMap<SkillId, u32>,
    pub statuses: StatusList,
    /// Turns this enemy has acted.
    pub turn_count: u32,
    /// Skill resolved during the current enemy turn, if it acted.
    #[serde(default)]
    pub executed_skill: Option<SkillId>,
    /// Most recent skills, oldest first, bounded by the anti-repeat window.
    pub last_used_skills: Vector<SkillId>,
}

impl EnemyInstance {
    /// Create a bare instance with full HP and no block.
    pub fn new(slot: usize, enemy_id: impl Into<EnemyId>, name: impl Into<String>, hp: i32) -> Self {
        Self {
            slot,
            enemy_id: enemy_id.into(),
            name: name.into(),
            max_hp: hp,
            current_hp: hp,
            current_block: 0,
            block_gained_this_turn: 0,
            base_block: 0,
            retains_block: false,
            current_intent: None,
            skill_cooldowns: OrdMap::new(),
            statuses: StatusList::new(),
            turn_count: 0,
            executed_skill: None,
            last_used_skills: Vector::new(),
        }
    }

    /// Spawn from static data, with HP scaled by difficulty.
    #[must_use]
    pub fn spawn(slot: usize, data: &EnemyData, config: &GameConfig) -> Self {
        let hp = config.scale_enemy_hp(data.hp);
        let mut enemy = Self::new(slot, data.id.clone(), data.name.clone(), hp);
        enemy.base_block = data.block.unwrap_or(0).max(0);
        enemy.retains_block = data.retains_block;
        enemy
    }

    #[must_use]
    pub fn with_block(mut self, block: i32) -> Self {
        self.current_block = block.max(0);
        self
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Remaining cooldown for a skill.
    #[must_use]
    pub fn cooldown(&self, skill: &SkillId) -> u32 {
        self.skill_cooldowns.get(skill).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_on_cooldown(&self, skill: &SkillId) -> bool {
        self.cooldown(skill) > 0
    }

    /// Whether the skill is in the recent-use window.
    #[must_use]
    pub fn recently_used(&self, skill: &SkillId) -> bool {
        self.last_used_skills.contains(skill)
    }

    /// Start a cooldown.
    pub fn set_cooldown(&mut self, skill: SkillId, turns: u32) {
        if turns > 0 {
            self.skill_cooldowns.insert(skill, turns);
        }
    }

    /// Count cooldowns down by one, dropping the finished ones.
    ///
    /// The skill executed this turn keeps its full cooldown, so a cooldown
    /// of N blocks the next N announcements.
    pub fn decrement_cooldowns(&mut self) {
        let executed = self.executed_skill.as_ref();
        self.skill_cooldowns = self
            .skill_cooldowns
            .iter()
            .filter_map(|(skill, &turns)| {
                if Some(skill) == executed {
                    Some((skill.clone(), turns))
                } else {
                    (turns > 1).then(|| (skill.clone(), turns - 1))
                }
            })
            .collect();
    }

    /// Mark the start of this enemy's turn.
    pub fn begin_turn(&mut self) {
        self.block_gained_this_turn = 0;
        self.executed_skill = None;
    }

    /// Record a skill that actually resolved this turn.
    pub fn record_execution(&mut self, skill: SkillId, window: usize) {
        self.turn_count += 1;
        self.remember_skill(skill.clone(), window);
        self.executed_skill = Some(skill);
    }

    /// Remember a used skill, keeping at most `window` entries.
    pub fn remember_skill(&mut self, skill: SkillId, window: usize) {
        if window == 0 {
            return;
        }
        self.last_used_skills.push_back(skill);
        while self.last_used_skills.len() > window {
            self.last_used_skills.pop_front();
        }
    }

    /// Drop block that should not survive the end of this enemy's turn.
    ///
    /// Returns the block before clearing. Block gained during the turn
    /// survives until the next one; retaining enemies keep everything.
    pub fn expire_block(&mut self) -> i32 {
        let before = self.current_block;
        if !self.retains_block {
            self.current_block = self.current_block.min(self.block_gained_this_turn.max(0));
        }
        before
    }
}
