//! 管理表单状态
//!
//! 把零散的 signal 收拢成 `Copy` 结构体，负责持有、重置以及转换为页面层的表单值。

use chelper_shared::{Task, Topic};
use leptos::prelude::*;

use crate::pages::admin::{TaskForm, TopicForm};

/// 主题表单状态
#[derive(Clone, Copy)]
pub struct TopicFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub content: RwSignal<String>,
    /// 表单内错误提示
    pub error: RwSignal<Option<String>>,
    pub busy: RwSignal<bool>,
}

impl TopicFormState {
    pub fn new() -> Self {
        Self::filled(TopicForm::default())
    }

    /// 编辑已有主题时预填
    pub fn for_topic(topic: &Topic) -> Self {
        Self::filled(TopicForm::from_topic(topic))
    }

    fn filled(form: TopicForm) -> Self {
        Self {
            title: RwSignal::new(form.title),
            description: RwSignal::new(form.description),
            content: RwSignal::new(form.content),
            error: RwSignal::new(None),
            busy: RwSignal::new(false),
        }
    }

    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.content.set(String::new());
        self.error.set(None);
    }

    pub fn to_form(&self) -> TopicForm {
        TopicForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            content: self.content.get_untracked(),
        }
    }
}

impl Default for TopicFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 任务表单状态
#[derive(Clone, Copy)]
pub struct TaskFormState {
    pub title: RwSignal<String>,
    pub condition: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub busy: RwSignal<bool>,
}

impl TaskFormState {
    pub fn new() -> Self {
        Self::filled(TaskForm::default())
    }

    /// 编辑已有任务时预填
    pub fn for_task(task: &Task) -> Self {
        Self::filled(TaskForm::from_task(task))
    }

    fn filled(form: TaskForm) -> Self {
        Self {
            title: RwSignal::new(form.title),
            condition: RwSignal::new(form.condition),
            error: RwSignal::new(None),
            busy: RwSignal::new(false),
        }
    }

    pub fn reset(&self) {
        self.title.set(String::new());
        self.condition.set(String::new());
        self.error.set(None);
    }

    pub fn to_form(&self) -> TaskForm {
        TaskForm {
            title: self.title.get_untracked(),
            condition: self.condition.get_untracked(),
        }
    }
}

impl Default for TaskFormState {
    fn default() -> Self {
        Self::new()
    }
}
