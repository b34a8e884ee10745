use crate::content::{Quest, QuestCategory, QuestSet, QuestType, RuachState, StateAssessment};

const LOW_ENERGY_MAX: u8 = 4;
const HIGH_STRESS_MIN: u8 = 7;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn quest(
    kind: QuestType,
    category: QuestCategory,
    title: &str,
    why: &str,
    steps: &[&str],
    fail_safe: &str,
) -> Quest {
    Quest {
        kind,
        category,
        title_ru: title.to_string(),
        why_ru: why.to_string(),
        steps_ru: strings(steps),
        fail_safe_ru: fail_safe.to_string(),
    }
}

/// Offline quest set. Inputs are expected to be clamped to `1..=10`.
pub(super) fn default_quests(energy: u8, stress: u8) -> QuestSet {
    let low_energy = energy <= LOW_ENERGY_MAX;
    let high_stress = stress >= HIGH_STRESS_MIN;

    let ruach_state = if high_stress {
        RuachState::Tense
    } else if low_energy {
        RuachState::Drained
    } else {
        RuachState::Calm
    };

    let main = if high_stress {
        quest(
            QuestType::Main,
            QuestCategory::Body,
            "Прогулка 15 минут",
            "Тело помогает разрядить напряжение. Экран через движение.",
            &[
                "Выйди на улицу",
                "Иди в любом направлении 7 минут",
                "Вернись обратно",
                "Дыши глубоко по пути",
            ],
            "5 минут стоя у окна, глубокое дыхание",
        )
    } else {
        quest(
            QuestType::Main,
            QuestCategory::Micro,
            "Записать 3 благодарности",
            "Кли расширяется через признание хорошего.",
            &[
                "Открой заметки",
                "Напиши 3 вещи, за которые благодарен сегодня",
                "Перечитай",
            ],
            "1 благодарность вслух",
        )
    };

    QuestSet {
        state_assessment: StateAssessment {
            ruach_state,
            notes_ru: "Офлайн режим. Базовые квесты.".to_string(),
        },
        quests: vec![
            main,
            quest(
                QuestType::Side,
                QuestCategory::Micro,
                "10 отжиманий или приседаний",
                "Тело в тонусе = ум в тонусе.",
                &["Встань", "Сделай 10 повторений", "Выпей воды"],
                "5 повторений",
            ),
            quest(
                QuestType::Side,
                QuestCategory::Micro,
                "5 минут без телефона",
                "Цимцум: сжатие создаёт пространство для кли.",
                &[
                    "Положи телефон в другую комнату",
                    "Поставь таймер на 5 минут",
                    "Просто сиди или смотри в окно",
                ],
                "2 минуты",
            ),
        ],
        safety_flags: Vec::new(),
        followups_ru: strings(&["Вернись, когда будет связь."]),
    }
}
