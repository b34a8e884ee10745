use crate::content::{ProtocolStep, StepKind, TriggerType};

// Each protocol runs label → breath → reframe → action → anchor in ~90 s.
const LABEL_SECS: u64 = 10;
const BREATH_SECS: u64 = 30;
const REFRAME_SECS: u64 = 20;
const ACTION_SECS: u64 = 20;
const ANCHOR_SECS: u64 = 10;

fn five_steps(
    label: &str,
    breath: &str,
    (reframe_title, reframe): (&str, &str),
    action: &str,
    anchor: &str,
) -> Vec<ProtocolStep> {
    vec![
        ProtocolStep::new(StepKind::Label, "Назови", label, LABEL_SECS),
        ProtocolStep::new(StepKind::Breath, "Дыши", breath, BREATH_SECS),
        ProtocolStep::new(StepKind::Reframe, reframe_title, reframe, REFRAME_SECS),
        ProtocolStep::new(StepKind::Action, "Действие", action, ACTION_SECS),
        ProtocolStep::new(StepKind::Anchor, "Якорь", anchor, ANCHOR_SECS),
    ]
}

pub(super) fn steps_for(trigger: TriggerType) -> Vec<ProtocolStep> {
    match trigger {
        TriggerType::Jealousy => five_steps(
            "Это ревность. Страх потери. Я вижу это.",
            "Вдох 4 сек → задержка 4 сек → выдох 4 сек → задержка 4 сек. Повтори 3 раза.",
            (
                "Экран",
                "Мой сосуд достаточен. Её выбор — её ответственность, не моя. Я не контролирую других.",
            ),
            "Одно дело для себя прямо сейчас: 10 отжиманий, стакан воды, 5 минут работы.",
            "ДОВЕРИЕ. Я делаю правильно — результат не в моём контроле.",
        ),
        TriggerType::Uncertainty => five_steps(
            "Это тревога. Неизвестность. Ум пытается контролировать будущее.",
            "Вдох 4 сек → задержка 7 сек → выдох 8 сек. Повтори 3 раза.",
            (
                "Цимцум",
                "Сжатие перед расширением. Неизвестность — пространство для роста. Я выдержу.",
            ),
            "Запиши одну вещь, которую ты МОЖЕШЬ контролировать сегодня. Сделай её.",
            "ДОВЕРИЕ. Я не знаю как — но я знаю, что справлюсь.",
        ),
        TriggerType::Anger => five_steps(
            "Это злость. Что-то кажется несправедливым. Я это вижу.",
            "Глубокий вдох носом → сильный выдох ртом. 5 раз. Выпусти напряжение.",
            (
                "Экран",
                "Экран: не реагировать автоматически, а выбирать ответ. Моя сила — в паузе.",
            ),
            "Напиши, что тебя злит. Потом — что ты РЕАЛЬНО можешь сделать (не фантазия мести).",
            "ДОВЕРИЕ. Я выбираю достоинство. Ответ — позже, когда остыну.",
        ),
        TriggerType::Shame => five_steps(
            "Это стыд. Чувство, что я недостаточно хорош. Это чувство, не факт.",
            "Положи руку на грудь. Вдох 4 сек → выдох 6 сек. Почувствуй тепло руки.",
            (
                "Тикун",
                "Тикун — исправление, не наказание. Ошибка — урок, не приговор. Я расту.",
            ),
            "Одно маленькое действие, где ты компетентен. Напомни себе: я умею.",
            "ДОВЕРИЕ. Моя ценность не зависит от одного момента.",
        ),
        TriggerType::Loneliness => five_steps(
            "Это одиночество. Чувство разъединения. Оно пройдёт.",
            "Обними себя руками. Вдох 4 сек → выдох 4 сек. Почувствуй своё тело.",
            (
                "Свет внутри",
                "Ор (свет) внутри меня. Связь с собой — основа всех связей. Я не один в себе.",
            ),
            "Напиши одному человеку простое сообщение. Или сделай что-то доброе для себя.",
            "ДОВЕРИЕ. Связи придут. Сначала — связь с собой.",
        ),
        TriggerType::Overwhelm => five_steps(
            "Это перегруз. Слишком много. Ум пытается охватить всё сразу.",
            "Стоп. Вдох 4 сек → выдох 8 сек (длинный). Повтори 4 раза. Замедлись.",
            (
                "Одна вещь",
                "Всё не надо. Одна вещь. Сейчас. Остальное — потом. Кли расширяется постепенно.",
            ),
            "Выбери ОДНУ задачу на следующие 25 минут. Только одну. Остальное — в список на потом.",
            "ДОВЕРИЕ. Я не должен всё сразу. Шаг за шагом.",
        ),
    }
}
