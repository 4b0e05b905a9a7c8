//! Shell script generation.
//!
//! Three scripts are produced, all for the bash family:
//!
//! - the per-environment artifact (`bin/veman_activate`) holding the full
//!   activation logic and the deactivation hook,
//! - the short activation script printed by `veman activate`, which the
//!   calling shell evaluates to source the artifact,
//! - the shell integration printed by `veman init`.

use std::fmt;

use crate::shell::{quote, quote_path};
use crate::store::Environment;

use super::session::{VAR_ACTIVE, VAR_ACTIVE_PATH, VAR_SAVED_HISTFILE, VAR_TEMPORARY};

/// Render the activation script artifact for `env`.
///
/// When sourced, the artifact:
///
/// 1. runs the active environment's hook first (environments do not nest),
/// 2. sources the runtime's `bin/activate`, then exports `VIRTUAL_ENV` and
///    makes sure `bin` leads `PATH`,
/// 3. records the current `HISTFILE` and switches to `.veman_history`,
/// 4. prefixes `PS1` with the environment's prompt,
/// 5. installs `veman_deactivate` as `deactivate` and on the `EXIT` trap.
pub fn render_artifact(env: &Environment) -> String {
    let root = quote_path(&env.root);
    let bin = quote_path(&env.bin_dir());
    let native = quote_path(&env.native_activate_file());
    let history = quote_path(&env.history_file());
    let name = quote(&env.name);
    let prompt = env.prompt();
    let ps1_prefix = quote(&format!("({}) ", prompt));
    let temporary = if env.temporary { "1" } else { "0" };

    format!(
        r#"# veman activation script for environment {name}
# Generated by veman {version}; regenerate with: veman upgrade --scripts {plain_name}
# Source this file from bash; running it as a program has no effect.

# Environments do not nest: leave the active one first.
if declare -F veman_deactivate >/dev/null 2>&1; then
    veman_deactivate
elif declare -F deactivate >/dev/null 2>&1; then
    deactivate
fi

# Session state, consumed by veman_deactivate.
export {saved}="${{HISTFILE-}}"
export {active}={name}
export {active_path}={root}
export {temp_var}={temporary}
_VEMAN_OLD_PS1="${{PS1-}}"
_VEMAN_OLD_PATH="${{PATH-}}"
_VEMAN_OLD_EXIT_TRAP="$(trap -p EXIT)"
_VEMAN_OLD_DISABLE_PROMPT="${{VIRTUAL_ENV_DISABLE_PROMPT-}}"

# Runtime activation; veman sets the prompt itself.
VIRTUAL_ENV_DISABLE_PROMPT=1
if [ -f {native} ]; then
    . {native}
fi
if declare -F deactivate >/dev/null 2>&1; then
    _veman_src="$(declare -f deactivate)"
    eval "_veman_native_deactivate${{_veman_src#deactivate}}"
    unset _veman_src
else
    _veman_native_deactivate () {{ :; }}
fi

export VIRTUAL_ENV={root}
case ":${{PATH-}}:" in
    *:{bin}:*) ;;
    *) PATH={bin}":${{PATH-}}" ;;
esac
export PATH
hash -r 2>/dev/null

# History: flush the current session, then switch files.
history -a 2>/dev/null
HISTFILE={history}
history -c
if [ -f "$HISTFILE" ]; then
    history -r
fi

# Prompt.
export VIRTUAL_ENV_PROMPT={prompt}
PS1={ps1_prefix}"${{_VEMAN_OLD_PS1}}"

veman_deactivate () {{
    history -a 2>/dev/null
    if [ -n "${{{saved}-}}" ]; then
        HISTFILE="${saved}"
    else
        unset HISTFILE
    fi
    history -c
    if [ -n "${{HISTFILE-}}" ] && [ -f "$HISTFILE" ]; then
        history -r
    fi

    if [ "${{{temp_var}-0}}" = 1 ] && [ -d "${{{active_path}-}}" ]; then
        rm -rf -- "${active_path}"
    fi

    _veman_native_deactivate
    PS1="${{_VEMAN_OLD_PS1-}}"
    if [ -n "${{_VEMAN_OLD_PATH-}}" ]; then
        PATH="$_VEMAN_OLD_PATH"
        export PATH
    fi
    if [ -n "${{_VEMAN_OLD_DISABLE_PROMPT-}}" ]; then
        VIRTUAL_ENV_DISABLE_PROMPT="$_VEMAN_OLD_DISABLE_PROMPT"
    else
        unset VIRTUAL_ENV_DISABLE_PROMPT
    fi
    unset VIRTUAL_ENV VIRTUAL_ENV_PROMPT
    hash -r 2>/dev/null

    if [ -n "${{_VEMAN_OLD_EXIT_TRAP-}}" ]; then
        eval "$_VEMAN_OLD_EXIT_TRAP"
    else
        trap - EXIT
    fi

    unset {saved} {active} {active_path} {temp_var}
    unset _VEMAN_OLD_PS1 _VEMAN_OLD_PATH _VEMAN_OLD_EXIT_TRAP _VEMAN_OLD_DISABLE_PROMPT
    unset -f deactivate _veman_native_deactivate veman_deactivate
}}

deactivate () {{
    veman_deactivate
}}

trap 'veman_deactivate' EXIT
"#,
        name = name,
        plain_name = env.name,
        version = env!("CARGO_PKG_VERSION"),
        saved = VAR_SAVED_HISTFILE,
        active = VAR_ACTIVE,
        active_path = VAR_ACTIVE_PATH,
        temp_var = VAR_TEMPORARY,
        root = root,
        bin = bin,
        native = native,
        history = history,
        prompt = quote(&prompt),
        ps1_prefix = ps1_prefix,
        temporary = temporary,
    )
}

/// The script printed by `veman activate` for the calling shell to `eval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationScript {
    environment: String,
    text: String,
}

impl ActivationScript {
    /// Build the activation script for `env`.
    pub fn for_environment(env: &Environment) -> Self {
        let artifact = quote_path(&env.artifact_file());
        let hint = quote(&format!(
            "veman: activation script missing for '{}'; run: veman upgrade --scripts {}",
            env.name, env.name
        ));
        let text = format!(
            "# veman: activate {name}\n\
             if [ -f {artifact} ]; then\n    . {artifact}\n\
             else\n    echo {hint} >&2\n    false\nfi\n",
            name = quote(&env.name),
            artifact = artifact,
            hint = hint,
        );
        Self {
            environment: env.name.clone(),
            text,
        }
    }

    /// Name of the environment being activated.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Script text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ActivationScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The bash function that evaluates activation output.
///
/// `activate`, `temp` and `create --activate` print scripts; every other
/// command passes straight through to the binary.
pub fn shell_integration() -> String {
    r#"# veman shell integration. Add to ~/.bashrc:
#   eval "$(command veman init)"
veman () {
    local _veman_cmd="" _veman_skip=0 _veman_eval=0 _veman_arg _veman_script
    case " $* " in
        *" -h "*|*" --help "*|*" -V "*|*" --version "*|*" --context "*)
            command veman "$@"
            return
            ;;
    esac
    for _veman_arg in "$@"; do
        if [ "$_veman_skip" = 1 ]; then
            _veman_skip=0
            continue
        fi
        case "$_veman_arg" in
            --env-dir) _veman_skip=1 ;;
            -*) ;;
            *) _veman_cmd="$_veman_arg"; break ;;
        esac
    done
    case "$_veman_cmd" in
        activate|temp) _veman_eval=1 ;;
        create)
            case " $* " in
                *" -a "*|*" --activate "*) _veman_eval=1 ;;
            esac
            ;;
    esac
    if [ "$_veman_eval" = 1 ]; then
        _veman_script="$(command veman "$@")" || return
        eval "$_veman_script"
    else
        command veman "$@"
    fi
}
"#
    .to_string()
}
