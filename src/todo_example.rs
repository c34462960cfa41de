//! A todo list application, with two higher-order components and a
//! context carrying the id of the authenticated user.

use std::sync::Arc;
use anyhow::{anyhow, bail, Result};
use kstring::KString;
use strum::{AsRefStr, EnumString};
use crate::{class::ComponentClass,
            component::{Base, Component, Element},
            context::{BaseContext, Context, BASE_CONTEXT},
            error::ConfigurationError,
            html::{button, div, form, h1, input_text, label, li, raw, ul},
            node::Node,
            proptype::PropType,
            value::Value};

/// A todo entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoObject {
    pub text: KString,
}

impl TodoObject {
    pub fn new(text: &str) -> TodoObject {
        TodoObject { text: KString::from_ref(text) }
    }
}

pub fn make_url(ty: &str) -> String {
    format!("/{ty}/add")
}

fn make_url_value() -> Value {
    Value::func(|args| {
        let ty = args.first().and_then(Value::as_str).ok_or_else(
            || anyhow!("make_url: expecting the type as first argument"))?;
        Ok(make_url(ty).into())
    })
}

fn todo_types() -> Value {
    vec!["todo", "thing"].into()
}

/// A higher-order component: renders `wrapped` with `type="thing"`,
/// which can't be set on it.
pub fn thingify(wrapped: &Arc<ComponentClass>) -> Result<Arc<ComponentClass>, ConfigurationError> {
    let inner = wrapped.clone();
    ComponentClass::builder(&format!("thingify({})", wrapped.name()))
        .props_from(wrapped)
        .exclude("type")
        .render(move |base, _| {
            Ok(Element::new(&inner)
               .with_prop("type", "thing")?
               .with_props(base.props().iter().map(|(n, v)| (n, v)))?
               .child(base.children())
               .into_node())
        })
        .define()
}

/// A higher-order component: renders `wrapped` with the prop
/// `prop_name` set from the result of `get_source`.
pub fn from_data_source(
    wrapped: &Arc<ComponentClass>,
    prop_name: &str,
    get_source: impl Fn(&Base, &Context) -> Result<Value> + Send + Sync + 'static,
) -> Result<Arc<ComponentClass>, ConfigurationError> {
    let inner = wrapped.clone();
    let name = KString::from_ref(prop_name);
    ComponentClass::builder(&format!("from_data_source({})", wrapped.name()))
        .props_from(wrapped)
        .exclude(prop_name)
        .render(move |base, ctx| {
            Ok(Element::new(&inner)
               .with_props(base.props().iter().map(|(n, v)| (n, v)))?
               .with_prop(&name, get_source(base, ctx)?)?
               .child(base.children())
               .into_node())
        })
        .define()
}

/// The data source for the todos: the ones of the user from the
/// context, none if there's no user.
pub fn get_todos(_props: &Base, ctx: &Context) -> Result<Value> {
    if !ctx.has_prop("authenticated_user_id") {
        return Ok(Value::List(Vec::new()))
    }
    let texts: &[&str] = match ctx.get::<i64>("authenticated_user_id")? {
        0 => &[],
        1 => &["1-1", "1-2"],
        2 => &["2-1", "2-2"],
        id => bail!("no todos for user {id}"),
    };
    Ok(Value::List(texts.iter().map(|t| Value::object(TodoObject::new(t))).collect()))
}

/// All classes of the application.
#[derive(Debug, Clone)]
pub struct TodoClasses {
    pub todo_form: Arc<ComponentClass>,
    pub todo: Arc<ComponentClass>,
    pub todo_list: Arc<ComponentClass>,
    pub todo_app: Arc<ComponentClass>,
    pub sourced_todo_app: Arc<ComponentClass>,
    pub thing_app: Arc<ComponentClass>,
    pub user_context: Arc<ComponentClass>,
}

impl TodoClasses {
    pub fn define() -> Result<TodoClasses, ConfigurationError> {
        let todo_form = ComponentClass::builder("TodoForm")
            .prop_default("add_url", PropType::union([PropType::Callable, PropType::Str]),
                          make_url_value())
            .choices("type", todo_types())
            .render(|base, _| {
                let ty = base.prop("type")?;
                let add_url = base.prop("add_url")?;
                let add_url = if add_url.is_callable() {
                    add_url.call(&[ty.clone()])?
                } else {
                    add_url.clone()
                };
                Ok(form()?
                   .with_prop("method", "post")?
                   .with_prop("action", add_url)?
                   .child(label()?.child(raw("New ")).child(ty).child(raw(": ")))
                   .child(input_text()?.with_prop("name", "todo")?)
                   .child(button()?.with_prop("type", "submit")?.child(raw("Add")))
                   .into_node())
            })
            .define()?;

        let todo = ComponentClass::builder("Todo")
            .required("todo", PropType::object::<TodoObject>())
            .render(|base, _| {
                let todo = base.prop("todo")?.as_object::<TodoObject>().ok_or_else(
                    || anyhow!("<Todo>: todo is not a TodoObject"))?;
                Ok(li()?.child(&todo.text).into_node())
            })
            .define()?;

        let todo_list = {
            let todo = todo.clone();
            ComponentClass::builder("TodoList")
                .required("todos", PropType::list(PropType::object::<TodoObject>()))
                .render(move |base, _| {
                    let items = base.get::<Vec<Value>>("todos")?.into_iter()
                        .map(|t| Ok(Element::new(&todo).with_prop("todo", t)?.into_node()))
                        .collect::<Result<Vec<Node>>>()?;
                    Ok(ul()?.child(items).into_node())
                })
                .define()?
        };

        let todo_app = {
            let todo_form = todo_form.clone();
            let todo_list = todo_list.clone();
            ComponentClass::builder("TodoApp")
                .required("todos", PropType::list(PropType::object::<TodoObject>()))
                .choices("type", todo_types())
                .render(move |base, _| {
                    let ty = base.prop("type")?;
                    Ok(div()?
                       .child(h1()?.child(raw("The \"")).child(ty).child(raw("\" list")))
                       .child(Element::new(&todo_form).with_prop("type", ty)?)
                       .child(Element::new(&todo_list).with_prop("todos", base.prop("todos")?)?)
                       .into_node())
                })
                .define()?
        };

        let sourced_todo_app = from_data_source(&todo_app, "todos", get_todos)?;
        let thing_app = thingify(&sourced_todo_app)?;

        let user_context = ComponentClass::builder("UserContext")
            .extends(&BASE_CONTEXT)
            .required("authenticated_user_id", PropType::Int)
            .define()?;

        Ok(TodoClasses {
            todo_form, todo, todo_list, todo_app, sourced_todo_app, thing_app, user_context
        })
    }
}

/// Which of the application classes to render at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ExampleApp {
    /// `thingify(from_data_source(TodoApp))`
    Thing,
    /// `from_data_source(TodoApp)`, with a settable `type`
    Sourced,
}

/// Render `app` for the user `user_id`, with `props` set on it.
pub fn render_app<K: AsRef<str>, V: Into<Value>>(
    app: ExampleApp,
    user_id: i64,
    props: impl IntoIterator<Item = (K, V)>,
) -> Result<String> {
    let classes = TodoClasses::define()?;
    let class = match app {
        ExampleApp::Thing => &classes.thing_app,
        ExampleApp::Sourced => &classes.sourced_todo_app,
    };
    BaseContext::new(&classes.user_context)
        .with_prop("authenticated_user_id", user_id)?
        .child(Element::new(class).with_props(props)?)
        .to_html_string()
}

pub fn render_example(user_id: i64) -> Result<String> {
    render_app(ExampleApp::Thing, user_id, Vec::<(&str, Value)>::new())
}
